//! A headless windowing and paged-fetch planning engine for very large tables.
//!
//! For the asynchronous fetch scheduler and host-loop wiring, see the `pagegrid-adapter` crate.
//!
//! This crate only does the math and bookkeeping needed to show a huge, remotely paged table
//! through a fixed-height viewport: scroll offset → visible rows, visible rows → pages to
//! fetch (with look-ahead and priorities), throttling of scroll input, per-page fetch state,
//! and a sparse row store.
//!
//! It is UI-agnostic and runtime-agnostic. A host is expected to provide:
//! - scroll offsets and a millisecond clock reading with each event
//! - row height and viewport height
//! - a way to fetch a page of rows (see `pagegrid-adapter`)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod document;
mod error;
mod fetch_state;
mod options;
mod planner;
mod range;
mod store;
mod throttle;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use document::TableDocument;
pub use error::{ConfigError, FetchError, TransitionError};
pub use fetch_state::{FetchState, PageStates, PageStatesSnapshot};
pub use options::GridOptions;
pub use planner::{PagePlan, page_count, page_of_row, page_row_range, plan_pages};
pub use range::calculate_visible_range;
pub use store::RowStore;
pub use throttle::Throttle;
pub use types::{Cell, CellValue, PlannedPage, Priority, Row, RowRange};
pub use window::Window;
