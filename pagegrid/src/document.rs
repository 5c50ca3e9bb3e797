use alloc::vec::Vec;

use crate::{GridOptions, Row};

/// The persisted form of an embedded table: a versioned record carrying the dataset and a
/// row-count hint.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDocument {
    pub version: u32,
    /// Declared number of rows. `0` means "use `rows.len()`".
    #[cfg_attr(feature = "serde", serde(default))]
    pub row_count_hint: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rows: Vec<Row>,
}

impl TableDocument {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            row_count_hint: rows.len(),
            rows,
        }
    }

    /// The row count a window over this document should be built with.
    pub fn row_count(&self) -> usize {
        if self.row_count_hint > 0 {
            self.row_count_hint
        } else {
            self.rows.len()
        }
    }

    /// Default options sized to this document.
    pub fn grid_options(&self) -> GridOptions {
        GridOptions::new(self.row_count())
    }
}
