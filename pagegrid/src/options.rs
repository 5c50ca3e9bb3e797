use crate::ConfigError;

/// Configuration for [`crate::Window`] and the fetch scheduler built on top of it.
///
/// All values are fixed for the lifetime of a window. Changing `total_rows` means building a new
/// window (and a new row store).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    /// Number of row slots in the table.
    pub total_rows: usize,
    /// Rows fetched per request.
    pub page_size: usize,
    /// Uniform row height in the scroll axis.
    pub row_height: u32,
    /// Height of the scrollable viewport.
    pub container_height: u32,
    /// Extra rows rendered beyond the strict viewport, on each side.
    pub overscan: usize,
    /// How far (in pages) the planner reaches ahead and behind the visible pages.
    pub prefetch_margin: usize,
    /// Minimum spacing between range recomputations under continuous scroll input.
    pub throttle_interval_ms: u64,
    /// Optional cap on outstanding fetches. `None` issues every eligible page at once.
    pub max_in_flight: Option<usize>,
}

impl GridOptions {
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const DEFAULT_ROW_HEIGHT: u32 = 60;
    pub const DEFAULT_CONTAINER_HEIGHT: u32 = 400;
    pub const DEFAULT_OVERSCAN: usize = 5;
    pub const DEFAULT_PREFETCH_MARGIN: usize = 2;
    pub const DEFAULT_THROTTLE_INTERVAL_MS: u64 = 100;

    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            page_size: Self::DEFAULT_PAGE_SIZE,
            row_height: Self::DEFAULT_ROW_HEIGHT,
            container_height: Self::DEFAULT_CONTAINER_HEIGHT,
            overscan: Self::DEFAULT_OVERSCAN,
            prefetch_margin: Self::DEFAULT_PREFETCH_MARGIN,
            throttle_interval_ms: Self::DEFAULT_THROTTLE_INTERVAL_MS,
            max_in_flight: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_container_height(mut self, container_height: u32) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_prefetch_margin(mut self, prefetch_margin: usize) -> Self {
        self.prefetch_margin = prefetch_margin;
        self
    }

    pub fn with_throttle_interval_ms(mut self, interval_ms: u64) -> Self {
        self.throttle_interval_ms = interval_ms;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Rejects configurations that would otherwise produce silently degenerate ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rows == 0 {
            return Err(ConfigError::ZeroTotalRows);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.row_height == 0 {
            return Err(ConfigError::ZeroRowHeight);
        }
        // A zero cap would never issue a fetch.
        if self.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroMaxInFlight);
        }
        Ok(())
    }

    /// Number of pages covering `total_rows`.
    pub fn page_count(&self) -> usize {
        crate::page_count(self.total_rows, self.page_size)
    }

    /// Height of the full scrollable content.
    pub fn total_height(&self) -> u64 {
        (self.total_rows as u64).saturating_mul(self.row_height as u64)
    }
}
