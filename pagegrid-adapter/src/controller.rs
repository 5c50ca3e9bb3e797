use pagegrid::{ConfigError, GridOptions, RowRange, Window};

use crate::{DataSource, FetchScheduler, PageEvent, View};

/// A framework-neutral controller that wires a [`pagegrid::Window`] to a [`FetchScheduler`].
///
/// This type does not hold any UI objects. Hosts drive it by calling:
/// - `on_scroll(offset, now_ms)` for every scroll event
/// - `tick(now_ms)` from a timer armed for [`Controller::deadline_ms`] (trailing scroll update)
/// - `next_completion().await` (or `drain_ready()`) to apply settled fetches
/// - `view()` to render
///
/// Every accepted range change triggers a planning pass that issues any missing pages.
#[derive(Debug)]
pub struct Controller<S> {
    window: Window,
    scheduler: FetchScheduler<S>,
}

impl<S: DataSource> Controller<S> {
    /// Validates `options`, computes the initial range and issues the first pages.
    pub fn new(options: GridOptions, source: S) -> Result<Self, ConfigError> {
        let window = Window::new(options)?;
        let scheduler = FetchScheduler::new(source, &options)?;
        let mut c = Self { window, scheduler };
        c.replan();
        Ok(c)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn scheduler(&self) -> &FetchScheduler<S> {
        &self.scheduler
    }

    /// Call this when the UI reports a scroll offset change.
    ///
    /// Returns the new range when the update was applied, `None` when it was deferred.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> Option<RowRange> {
        let range = self.window.on_scroll(offset, now_ms)?;
        self.replan();
        Some(range)
    }

    /// Applies a deferred scroll update once it is due.
    ///
    /// A scroll event landing on the deadline should go through [`Controller::on_scroll`] first;
    /// see [`Window::tick`].
    pub fn tick(&mut self, now_ms: u64) -> Option<RowRange> {
        let range = self.window.tick(now_ms)?;
        self.replan();
        Some(range)
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.window.deadline_ms()
    }

    pub fn on_container_height(&mut self, container_height: u32) -> RowRange {
        let range = self.window.set_container_height(container_height);
        self.replan();
        range
    }

    /// Runs a planning pass for the current range. Returns the newly issued pages.
    pub fn replan(&mut self) -> Vec<usize> {
        let plan = self.window.plan();
        self.scheduler.schedule(&plan)
    }

    /// Re-arms an errored page and immediately re-plans, so it is re-issued if still needed.
    ///
    /// Returns `false` if the page was not errored.
    pub fn retry(&mut self, page_index: usize) -> bool {
        if !self.scheduler.retry(page_index) {
            return false;
        }
        self.replan();
        true
    }

    /// Waits for the next fetch to settle, applies it, and re-plans.
    pub async fn next_completion(&mut self) -> Option<PageEvent> {
        let event = self.scheduler.next_completion().await?;
        self.replan();
        Some(event)
    }

    /// Applies every already-settled fetch without waiting.
    pub fn drain_ready(&mut self) -> Vec<PageEvent> {
        let events = self.scheduler.drain_ready();
        if !events.is_empty() {
            self.replan();
        }
        events
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn view(&self) -> View<'_> {
        let range = self.window.visible_range();
        let options = self.window.options();
        View {
            range,
            slice: self.scheduler.visible_slice(range),
            loading: self.scheduler.pages().loading(),
            errored: self.scheduler.pages().errored(),
            total_height: self.window.total_height(),
            row_height: options.row_height,
            page_size: options.page_size,
        }
    }
}
