use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{PlannedPage, Priority, RowRange};

/// Page that owns global row `row`.
pub fn page_of_row(row: usize, page_size: usize) -> usize {
    debug_assert!(page_size > 0, "page_of_row: page_size must be > 0");
    row / page_size.max(1)
}

/// Number of pages needed to cover `total_rows`.
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

/// Rows owned by `page_index`, clipped to the table. `None` if the page lies past the end.
///
/// The final page is shorter when `total_rows` is not a multiple of `page_size`.
pub fn page_row_range(page_index: usize, page_size: usize, total_rows: usize) -> Option<RowRange> {
    if page_size == 0 {
        return None;
    }
    let start = page_index.checked_mul(page_size)?;
    if start >= total_rows {
        return None;
    }
    let end = start.saturating_add(page_size - 1).min(total_rows - 1);
    Some(RowRange::new(start, end))
}

/// The pages a visible range needs, each once, ordered by priority then page index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagePlan {
    pages: Vec<PlannedPage>,
}

impl PagePlan {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PlannedPage> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[PlannedPage] {
        &self.pages
    }

    pub fn priority_of(&self, page_index: usize) -> Option<Priority> {
        self.pages
            .iter()
            .find(|p| p.page_index == page_index)
            .map(|p| p.priority)
    }

    pub fn contains(&self, page_index: usize) -> bool {
        self.priority_of(page_index).is_some()
    }

    /// Page indexes of one priority class, ascending.
    pub fn pages_with(&self, priority: Priority) -> impl Iterator<Item = usize> + '_ {
        self.pages
            .iter()
            .filter(move |p| p.priority == priority)
            .map(|p| p.page_index)
    }
}

impl<'a> IntoIterator for &'a PagePlan {
    type Item = &'a PlannedPage;
    type IntoIter = core::slice::Iter<'a, PlannedPage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Maps a visible row range to the pages that must be resident.
///
/// - pages touching `visible` are [`Priority::Visible`];
/// - the page right before and right after those are [`Priority::Adjacent`];
/// - `[start - margin, start - 1)` and `(end + 1, end + margin]` are [`Priority::Prefetch`].
///
/// Everything is clamped to `[0, last page]`. Returns an empty plan for an empty table.
pub fn plan_pages(
    visible: RowRange,
    page_size: usize,
    total_rows: usize,
    prefetch_margin: usize,
) -> PagePlan {
    if page_size == 0 || total_rows == 0 {
        return PagePlan::default();
    }

    let max_page = (total_rows - 1) / page_size;
    let end_row = visible.end_index.min(total_rows - 1);
    let start_page = page_of_row(visible.start_index.min(end_row), page_size);
    let end_page = page_of_row(end_row, page_size).min(max_page);

    let mut best: BTreeMap<usize, Priority> = BTreeMap::new();
    let mut offer = |page_index: usize, priority: Priority| {
        if page_index > max_page {
            return;
        }
        best.entry(page_index)
            .and_modify(|p| *p = (*p).min(priority))
            .or_insert(priority);
    };

    for page in start_page..=end_page {
        offer(page, Priority::Visible);
    }

    if let Some(before) = start_page.checked_sub(1) {
        offer(before, Priority::Adjacent);
    }
    offer(end_page.saturating_add(1), Priority::Adjacent);

    let low = start_page.saturating_sub(prefetch_margin);
    let low_end = start_page.saturating_sub(1);
    for page in low..low_end {
        offer(page, Priority::Prefetch);
    }

    let high_end = end_page.saturating_add(prefetch_margin).min(max_page);
    for page in end_page.saturating_add(2)..=high_end {
        offer(page, Priority::Prefetch);
    }

    let mut pages: Vec<PlannedPage> = best
        .into_iter()
        .map(|(page_index, priority)| PlannedPage {
            page_index,
            priority,
        })
        .collect();
    // Stable: page index stays ascending within a class.
    pages.sort_by_key(|p| p.priority);

    vtrace!(
        start_page,
        end_page,
        max_page,
        planned = pages.len(),
        "plan_pages"
    );

    PagePlan { pages }
}
