use alloc::collections::BTreeSet;

use crate::TransitionError;

/// Fetch lifecycle of one page.
///
/// ```text
/// Unrequested --request--> Loading --succeed--> Fetched
///      ^                      |
///      +------retry------ Errored <--fail--+
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchState {
    #[default]
    Unrequested,
    Loading,
    Fetched,
    Errored,
}

/// Per-page fetch state for one table.
///
/// `Unrequested` is implicit (a page in none of the sets). A page is in at most one of
/// `loading`, `fetched`, `errored` at any time; every transition checks its source state and
/// leaves the sets untouched on error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageStates {
    loading: BTreeSet<usize>,
    fetched: BTreeSet<usize>,
    errored: BTreeSet<usize>,
}

/// An owned copy of [`PageStates`] for presentation layers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageStatesSnapshot {
    pub loading: BTreeSet<usize>,
    pub fetched: BTreeSet<usize>,
    pub errored: BTreeSet<usize>,
}

impl PageStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, page_index: usize) -> FetchState {
        if self.loading.contains(&page_index) {
            FetchState::Loading
        } else if self.fetched.contains(&page_index) {
            FetchState::Fetched
        } else if self.errored.contains(&page_index) {
            FetchState::Errored
        } else {
            FetchState::Unrequested
        }
    }

    /// Whether the next planning pass may issue a fetch for `page_index`.
    pub fn is_eligible(&self, page_index: usize) -> bool {
        self.state_of(page_index) == FetchState::Unrequested
    }

    /// `Unrequested -> Loading`.
    pub fn request(&mut self, page_index: usize) -> Result<(), TransitionError> {
        self.expect(page_index, FetchState::Unrequested, FetchState::Loading)?;
        self.loading.insert(page_index);
        Ok(())
    }

    /// `Loading -> Fetched`.
    pub fn succeed(&mut self, page_index: usize) -> Result<(), TransitionError> {
        self.expect(page_index, FetchState::Loading, FetchState::Fetched)?;
        self.loading.remove(&page_index);
        self.fetched.insert(page_index);
        Ok(())
    }

    /// `Loading -> Errored`.
    pub fn fail(&mut self, page_index: usize) -> Result<(), TransitionError> {
        self.expect(page_index, FetchState::Loading, FetchState::Errored)?;
        self.loading.remove(&page_index);
        self.errored.insert(page_index);
        Ok(())
    }

    /// `Errored -> Unrequested`. Only re-arms the page; it does not fetch.
    pub fn retry(&mut self, page_index: usize) -> Result<(), TransitionError> {
        self.expect(page_index, FetchState::Errored, FetchState::Unrequested)?;
        self.errored.remove(&page_index);
        Ok(())
    }

    fn expect(
        &self,
        page_index: usize,
        from: FetchState,
        to: FetchState,
    ) -> Result<(), TransitionError> {
        let current = self.state_of(page_index);
        if current == from {
            return Ok(());
        }
        Err(TransitionError {
            page_index,
            from: current,
            to,
        })
    }

    pub fn loading(&self) -> &BTreeSet<usize> {
        &self.loading
    }

    pub fn fetched(&self) -> &BTreeSet<usize> {
        &self.fetched
    }

    pub fn errored(&self) -> &BTreeSet<usize> {
        &self.errored
    }

    /// Number of fetches currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.loading.len()
    }

    pub fn snapshot(&self) -> PageStatesSnapshot {
        PageStatesSnapshot {
            loading: self.loading.clone(),
            fetched: self.fetched.clone(),
            errored: self.errored.clone(),
        }
    }
}
