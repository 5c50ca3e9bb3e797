use crate::{
    ConfigError, GridOptions, PagePlan, RowRange, Throttle, calculate_visible_range, plan_pages,
};

/// The synchronous windowing engine for one table.
///
/// It holds no rows and performs no I/O. The host feeds it scroll offsets and clock readings;
/// it answers with the current visible range and the page plan for that range:
///
/// - `on_scroll(offset, now_ms)` for every raw scroll event (throttled);
/// - `tick(now_ms)` from a timer or frame loop to release the trailing scroll update;
/// - `plan()` after every accepted update, to find out which pages must be resident.
#[derive(Clone, Debug)]
pub struct Window {
    options: GridOptions,
    scroll_offset: u64,
    range: RowRange,
    throttle: Throttle<u64>,
}

impl Window {
    /// Validates `options` and computes the initial range at scroll offset 0.
    pub fn new(options: GridOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let range = calculate_visible_range(
            0,
            options.container_height,
            options.row_height,
            options.overscan,
            options.total_rows,
        )
        .ok_or(ConfigError::ZeroTotalRows)?;
        vdebug!(
            total_rows = options.total_rows,
            page_size = options.page_size,
            row_height = options.row_height,
            container_height = options.container_height,
            overscan = options.overscan,
            "Window::new"
        );
        Ok(Self {
            options,
            scroll_offset: 0,
            range,
            throttle: Throttle::new(options.throttle_interval_ms),
        })
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Feeds a raw scroll offset.
    ///
    /// Returns the recomputed range when the throttle lets the update through, `None` when it
    /// was deferred (call [`Window::tick`] later to release it).
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> Option<RowRange> {
        let offset = self.throttle.call(offset, now_ms)?;
        Some(self.apply_offset(offset))
    }

    /// Releases a deferred scroll update once its deadline has passed.
    ///
    /// When a scroll event arrives at the same instant as the deadline, feed it to
    /// [`Window::on_scroll`] before calling `tick`: the event is then applied directly and the
    /// deferred update is dropped, instead of being released and followed by another deferral.
    pub fn tick(&mut self, now_ms: u64) -> Option<RowRange> {
        let offset = self.throttle.poll(now_ms)?;
        Some(self.apply_offset(offset))
    }

    /// Applies a deferred scroll update right away.
    pub fn flush(&mut self, now_ms: u64) -> Option<RowRange> {
        let offset = self.throttle.flush(now_ms)?;
        Some(self.apply_offset(offset))
    }

    /// When the deferred scroll update becomes due, if there is one.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.throttle.deadline_ms()
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.throttle.has_pending()
    }

    /// Geometry changes bypass the throttle.
    pub fn set_container_height(&mut self, container_height: u32) -> RowRange {
        if self.options.container_height != container_height {
            self.options.container_height = container_height;
            self.range = self.range_for(self.scroll_offset);
        }
        self.range
    }

    fn apply_offset(&mut self, offset: u64) -> RowRange {
        self.scroll_offset = offset;
        self.range = self.range_for(offset);
        vtrace!(
            offset,
            start_index = self.range.start_index,
            end_index = self.range.end_index,
            "Window::apply_offset"
        );
        self.range
    }

    /// Range for an arbitrary offset, without touching the window's state.
    pub fn range_for(&self, offset: u64) -> RowRange {
        calculate_visible_range(
            offset,
            self.options.container_height,
            self.options.row_height,
            self.options.overscan,
            self.options.total_rows,
        )
        .unwrap_or(self.range)
    }

    /// The last applied scroll offset.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn visible_range(&self) -> RowRange {
        self.range
    }

    pub fn total_rows(&self) -> usize {
        self.options.total_rows
    }

    /// Height of the full content (`total_rows * row_height`).
    pub fn total_height(&self) -> u64 {
        self.options.total_height()
    }

    /// Top edge of row `index` inside the content.
    pub fn row_offset(&self, index: usize) -> Option<u64> {
        (index < self.options.total_rows)
            .then(|| (index as u64).saturating_mul(self.options.row_height as u64))
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_height()
            .saturating_sub(self.options.container_height as u64)
    }

    pub fn page_count(&self) -> usize {
        self.options.page_count()
    }

    /// Page plan for the current visible range.
    pub fn plan(&self) -> PagePlan {
        self.plan_for(self.range)
    }

    pub fn plan_for(&self, range: RowRange) -> PagePlan {
        plan_pages(
            range,
            self.options.page_size,
            self.options.total_rows,
            self.options.prefetch_margin,
        )
    }
}
