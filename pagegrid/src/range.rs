use crate::RowRange;

/// Maps a scroll position to the inclusive range of rows to render.
///
/// `start = floor(offset / row_height) - overscan` and
/// `end = ceil((offset + viewport_height) / row_height) + overscan`, both clamped to the table.
/// An offset past the end of the content pins the range to the last row.
///
/// Returns `None` when there is nothing to index (`total_rows == 0` or `row_height == 0`).
pub fn calculate_visible_range(
    scroll_offset: u64,
    viewport_height: u32,
    row_height: u32,
    overscan: usize,
    total_rows: usize,
) -> Option<RowRange> {
    if total_rows == 0 || row_height == 0 {
        return None;
    }
    let row_height = row_height as u64;
    let last = total_rows - 1;

    let first_row = usize::try_from(scroll_offset / row_height).unwrap_or(usize::MAX);
    let start = first_row.saturating_sub(overscan);

    let bottom = scroll_offset.saturating_add(viewport_height as u64);
    let last_row = usize::try_from(bottom.div_ceil(row_height)).unwrap_or(usize::MAX);
    let end = last_row.saturating_add(overscan).min(last);

    Some(RowRange::new(start.min(end), end))
}
