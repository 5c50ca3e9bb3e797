//! Async page fetching and host-loop wiring for the `pagegrid` crate.
//!
//! The `pagegrid` crate is runtime-agnostic and only computes ranges, plans and state
//! transitions. This crate adds the parts that touch a data source:
//!
//! - [`DataSource`]: the injected page-fetch capability
//! - [`FetchScheduler`]: issues page futures by priority and merges their results
//! - [`Controller`]: scroll → throttle → range → plan → fetch, plus a render [`View`]
//!
//! No executor is bundled. Fetch futures only run while the owner awaits
//! `next_completion()`, so any async runtime (or a hand-rolled loop) can drive it.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod scheduler;
mod source;
mod view;


pub use controller::Controller;
pub use scheduler::{FetchScheduler, PageEvent};
pub use source::{DataSource, FnSource, MemorySource, PageFuture, from_fn};
pub use view::{RowSlot, View};
