use alloc::string::String;

use crate::FetchState;

/// Rejected configuration. These are caller contract violations, reported at construction.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("total_rows must be greater than zero")]
    ZeroTotalRows,
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
    #[error("row_height must be greater than zero")]
    ZeroRowHeight,
    #[error("max_in_flight must be greater than zero when set")]
    ZeroMaxInFlight,
}

/// A page retrieval failure, as reported by a data source.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchError {
    #[error("page {page_index} was rejected: {message}")]
    Rejected { page_index: usize, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn rejected(page_index: usize, message: impl Into<String>) -> Self {
        Self::Rejected {
            page_index,
            message: message.into(),
        }
    }
}

/// An illegal fetch-state transition.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("page {page_index}: cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub page_index: usize,
    pub from: FetchState,
    pub to: FetchState,
}
