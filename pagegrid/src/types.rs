use alloc::string::String;
use alloc::vec::Vec;

/// An inclusive range of global row indexes.
///
/// Unlike most Rust ranges, both ends are included: `RowRange { start_index: 0, end_index: 16 }`
/// covers 17 rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl RowRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "RowRange: start after end (start={start_index}, end={end_index})"
        );
        Self {
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }
}

/// Fetch priority class of a planned page. Lower value means issued earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Priority {
    /// The page holds rows inside the visible range.
    Visible = 0,
    /// The page directly before or after the visible pages.
    Adjacent = 1,
    /// Speculative look-ahead within the prefetch margin.
    Prefetch = 2,
}

impl Priority {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedPage {
    pub page_index: usize,
    pub priority: Priority,
}

/// A scalar cell value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub id: String,
    pub value: CellValue,
}

impl Cell {
    pub fn new(id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// A fetched row. Immutable once stored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub id: String,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(id: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}
