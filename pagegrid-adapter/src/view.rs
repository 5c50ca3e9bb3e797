use std::collections::BTreeSet;

use pagegrid::{Row, RowRange, page_of_row};

/// How the presentation layer should draw one visible slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RowSlot<'a> {
    Ready(&'a Row),
    /// The owning page is being fetched.
    Loading,
    /// The owning page failed; offer a retry for `page_index`.
    Errored { page_index: usize },
    /// Not requested yet (e.g. held back by the in-flight cap).
    Absent,
}

impl RowSlot<'_> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// A read-only snapshot of everything a renderer needs for one frame.
///
/// Rows are positioned at `index * row_height` inside a container `total_height` tall.
#[derive(Clone, Debug)]
pub struct View<'a> {
    pub range: RowRange,
    /// One entry per index of `range`; `None` where the row is not available.
    pub slice: Vec<Option<&'a Row>>,
    pub loading: &'a BTreeSet<usize>,
    pub errored: &'a BTreeSet<usize>,
    pub total_height: u64,
    pub row_height: u32,
    pub page_size: usize,
}

impl<'a> View<'a> {
    pub fn row_offset(&self, index: usize) -> u64 {
        (index as u64).saturating_mul(self.row_height as u64)
    }

    /// Visible slots with their global index, classified for placeholder rendering.
    pub fn slots(&self) -> impl Iterator<Item = (usize, RowSlot<'a>)> + '_ {
        self.range.iter().zip(self.slice.iter()).map(|(index, row)| {
            let slot = match *row {
                Some(row) => RowSlot::Ready(row),
                None => {
                    let page_index = page_of_row(index, self.page_size);
                    if self.loading.contains(&page_index) {
                        RowSlot::Loading
                    } else if self.errored.contains(&page_index) {
                        RowSlot::Errored { page_index }
                    } else {
                        RowSlot::Absent
                    }
                }
            };
            (index, slot)
        })
    }
}
