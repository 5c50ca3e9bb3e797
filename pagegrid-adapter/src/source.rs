use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use pagegrid::{FetchError, Row, TableDocument, page_row_range};

/// The eventual result of one page request.
pub type PageFuture = BoxFuture<'static, Result<Vec<Row>, FetchError>>;

/// Where pages of rows come from.
///
/// Calling `fetch_page` is the issue point: the scheduler calls it in priority order and polls
/// the returned future until it settles. Implementations decide transport, latency and retries;
/// any `Err` simply marks the page as errored.
pub trait DataSource: Send + Sync {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> PageFuture;
}

impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> PageFuture {
        (**self).fetch_page(page_index, page_size)
    }
}

/// A [`DataSource`] backed by a closure. See [`from_fn`].
pub struct FnSource<F>(F);

/// Wraps `f(page_index, page_size)` as a [`DataSource`].
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(usize, usize) -> PageFuture + Send + Sync,
{
    FnSource(f)
}

impl<F> DataSource for FnSource<F>
where
    F: Fn(usize, usize) -> PageFuture + Send + Sync,
{
    fn fetch_page(&self, page_index: usize, page_size: usize) -> PageFuture {
        (self.0)(page_index, page_size)
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSource(..)")
    }
}

/// Serves pages out of rows already held in memory (e.g. a persisted [`TableDocument`]).
///
/// Pages resolve immediately. Requests past the end are rejected.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    rows: Arc<Vec<Row>>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    pub fn from_document(document: TableDocument) -> Self {
        Self::new(document.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DataSource for MemorySource {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> PageFuture {
        let result = match page_row_range(page_index, page_size, self.rows.len()) {
            Some(range) => Ok(self.rows[range.start_index..=range.end_index].to_vec()),
            None => Err(FetchError::rejected(page_index, "page is out of range")),
        };
        future::ready(result).boxed()
    }
}
