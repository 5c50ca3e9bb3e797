use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{Row, RowRange, page_row_range};

/// A sparse, logical array of `total_rows` row slots.
///
/// Slots start absent and only become present when the page that owns them is merged. Nothing
/// is ever evicted or compacted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowStore {
    total_rows: usize,
    rows: BTreeMap<usize, Row>,
}

impl RowStore {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            rows: BTreeMap::new(),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(&index)
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.rows.contains_key(&index)
    }

    /// Number of slots currently holding a row.
    pub fn present_count(&self) -> usize {
        self.rows.len()
    }

    /// Writes the rows of one fetched page at their global offsets.
    ///
    /// Rows past the page's own slots or past `total_rows` are dropped. Returns how many slots
    /// were written.
    pub fn merge_page(
        &mut self,
        page_index: usize,
        page_size: usize,
        rows: impl IntoIterator<Item = Row>,
    ) -> usize {
        let Some(owned) = page_row_range(page_index, page_size, self.total_rows) else {
            vwarn!(
                page_index,
                page_size,
                total_rows = self.total_rows,
                "RowStore::merge_page: page lies past the end of the table"
            );
            return 0;
        };

        let mut written = 0usize;
        let mut dropped = 0usize;
        for (offset, row) in rows.into_iter().enumerate() {
            let index = owned.start_index.saturating_add(offset);
            if !owned.contains(index) {
                dropped += 1;
                continue;
            }
            self.rows.insert(index, row);
            written += 1;
        }
        if dropped > 0 {
            vdebug!(page_index, written, dropped, "RowStore::merge_page clipped rows");
        }
        written
    }

    /// The slots of `range` in order, `None` for absent ones. Indexes past the table are skipped.
    pub fn visible_slice(&self, range: RowRange) -> Vec<Option<&Row>> {
        if self.total_rows == 0 {
            return Vec::new();
        }
        let end = range.end_index.min(self.total_rows - 1);
        if range.start_index > end {
            return Vec::new();
        }
        (range.start_index..=end).map(|i| self.rows.get(&i)).collect()
    }

    /// Iterates over present rows with their global index, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().map(|(i, r)| (*i, r))
    }
}
