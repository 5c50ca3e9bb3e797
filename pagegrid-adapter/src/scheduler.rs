use std::fmt;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use pagegrid::{
    ConfigError, FetchError, GridOptions, PagePlan, PageStates, PageStatesSnapshot, Row,
    RowRange, RowStore, page_row_range,
};

use crate::DataSource;

type Completion = (usize, Result<Vec<Row>, FetchError>);

/// What happened to a page when its fetch settled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageEvent {
    /// The page's rows were merged; `rows` slots were written.
    Fetched { page_index: usize, rows: usize },
    /// The source rejected the page. Its slots stay absent until a retry succeeds.
    Failed {
        page_index: usize,
        error: FetchError,
    },
}

impl PageEvent {
    pub fn page_index(&self) -> usize {
        match self {
            Self::Fetched { page_index, .. } | Self::Failed { page_index, .. } => *page_index,
        }
    }
}

/// Issues page fetches against a [`DataSource`] and folds their results into a [`RowStore`].
///
/// The scheduler is single-owner and lock-free: fetch futures are kept in a
/// [`FuturesUnordered`] and only make progress while the owner awaits
/// [`FetchScheduler::next_completion`] (or calls [`FetchScheduler::drain_ready`]). Every state
/// change therefore happens on the owner's task, one completion at a time.
///
/// Invariants:
/// - at most one outstanding fetch per page (a `Loading` page is never re-issued);
/// - a failure only ever affects its own page;
/// - results are merged even if the page is no longer planned.
pub struct FetchScheduler<S> {
    source: S,
    page_size: usize,
    total_rows: usize,
    max_in_flight: Option<usize>,
    pages: PageStates,
    store: RowStore,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<S: DataSource> FetchScheduler<S> {
    pub fn new(source: S, options: &GridOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            source,
            page_size: options.page_size,
            total_rows: options.total_rows,
            max_in_flight: options.max_in_flight,
            pages: PageStates::new(),
            store: RowStore::new(options.total_rows),
            in_flight: FuturesUnordered::new(),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Issues a fetch for every `Unrequested` page of `plan`, in plan (priority) order.
    ///
    /// Pages that are loading, fetched or errored are skipped. With `max_in_flight` set, issuing
    /// stops once the cap is reached; the remaining pages wait for a later pass.
    ///
    /// Returns the issued page indexes, in issue order.
    pub fn schedule(&mut self, plan: &PagePlan) -> Vec<usize> {
        let mut issued = Vec::new();
        for planned in plan {
            if self
                .max_in_flight
                .is_some_and(|cap| self.pages.in_flight() >= cap)
            {
                vdebug!(cap = ?self.max_in_flight, "schedule: in-flight cap reached");
                break;
            }

            let page_index = planned.page_index;
            if page_row_range(page_index, self.page_size, self.total_rows).is_none() {
                vwarn!(page_index, "schedule: planned page lies past the end of the table");
                continue;
            }
            if self.pages.request(page_index).is_err() {
                continue;
            }

            vtrace!(page_index, priority = planned.priority.rank(), "schedule: issue");
            let fetch = self.source.fetch_page(page_index, self.page_size);
            self.in_flight
                .push(fetch.map(move |result| (page_index, result)).boxed());
            issued.push(page_index);
        }
        if !issued.is_empty() {
            vdebug!(issued = issued.len(), in_flight = self.pages.in_flight(), "schedule");
        }
        issued
    }

    /// Waits for the next fetch to settle and applies it.
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<PageEvent> {
        while let Some((page_index, result)) = self.in_flight.next().await {
            if let Some(event) = self.complete(page_index, result) {
                return Some(event);
            }
        }
        None
    }

    /// Applies every fetch that has already settled, without waiting.
    pub fn drain_ready(&mut self) -> Vec<PageEvent> {
        let mut events = Vec::new();
        while let Some(Some((page_index, result))) = self.in_flight.next().now_or_never() {
            events.extend(self.complete(page_index, result));
        }
        events
    }

    fn complete(
        &mut self,
        page_index: usize,
        result: Result<Vec<Row>, FetchError>,
    ) -> Option<PageEvent> {
        let transition = match &result {
            Ok(_) => self.pages.succeed(page_index),
            Err(_) => self.pages.fail(page_index),
        };
        // Only one fetch per page can be outstanding, so the page must still be loading.
        debug_assert!(
            transition.is_ok(),
            "complete: page {page_index} was not loading"
        );
        if let Err(_err) = transition {
            vwarn!(page_index, from = ?_err.from, "complete: page was not loading");
            return None;
        }

        match result {
            Ok(rows) => {
                let rows = self.store.merge_page(page_index, self.page_size, rows);
                vdebug!(page_index, rows, "page fetched");
                Some(PageEvent::Fetched { page_index, rows })
            }
            Err(error) => {
                vdebug!(page_index, %error, "page failed");
                Some(PageEvent::Failed { page_index, error })
            }
        }
    }

    /// Re-arms an errored page so the next [`FetchScheduler::schedule`] issues it again.
    ///
    /// Returns `false` (and changes nothing) if the page is not errored.
    pub fn retry(&mut self, page_index: usize) -> bool {
        match self.pages.retry(page_index) {
            Ok(()) => {
                vdebug!(page_index, "retry");
                true
            }
            Err(_) => false,
        }
    }

    pub fn pages(&self) -> &PageStates {
        &self.pages
    }

    pub fn snapshot(&self) -> PageStatesSnapshot {
        self.pages.snapshot()
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of fetches issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn visible_slice(&self, range: RowRange) -> Vec<Option<&Row>> {
        self.store.visible_slice(range)
    }
}

impl<S> fmt::Debug for FetchScheduler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchScheduler")
            .field("page_size", &self.page_size)
            .field("total_rows", &self.total_rows)
            .field("max_in_flight", &self.max_in_flight)
            .field("pages", &self.pages)
            .field("present_rows", &self.store.present_count())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}
