use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn row(i: usize) -> Row {
    Row::new(
        format!("row-{i}"),
        vec![Cell::new("id", i as f64), Cell::new("name", format!("Row {i}"))],
    )
}

fn page_rows(page_index: usize, len: usize, page_size: usize) -> Vec<Row> {
    (0..len).map(|i| row(page_index * page_size + i)).collect()
}

fn reference_options() -> GridOptions {
    GridOptions::new(1000)
        .with_page_size(20)
        .with_row_height(60)
        .with_container_height(400)
        .with_overscan(5)
        .with_prefetch_margin(2)
}

fn pages(plan: &PagePlan) -> Vec<(usize, Priority)> {
    plan.iter().map(|p| (p.page_index, p.priority)).collect()
}

#[test]
fn initial_range_at_offset_zero() {
    let r = calculate_visible_range(0, 400, 60, 5, 1000).unwrap();
    // ceil(400 / 60) = 7, plus overscan(5)
    assert_eq!(r, RowRange::new(0, 12));
    assert_eq!(r.len(), 13);
}

#[test]
fn range_follows_scroll_offset() {
    let r = calculate_visible_range(3000, 400, 60, 5, 1000).unwrap();
    assert_eq!(r.start_index, 45);
    assert_eq!(r.end_index, 62);
}

#[test]
fn range_is_clamped_at_both_ends() {
    let r = calculate_visible_range(0, 10_000, 10, 3, 50).unwrap();
    assert_eq!(r, RowRange::new(0, 49));

    // Far past the content: pinned to the last row instead of inverting.
    let r = calculate_visible_range(1_000_000, 100, 10, 3, 50).unwrap();
    assert_eq!(r, RowRange::new(49, 49));
}

#[test]
fn range_for_empty_table_is_none() {
    assert_eq!(calculate_visible_range(0, 400, 60, 5, 0), None);
    assert_eq!(calculate_visible_range(0, 400, 0, 5, 10), None);
}

#[test]
fn zero_height_viewport_still_yields_overscan_rows() {
    let r = calculate_visible_range(600, 0, 60, 2, 100).unwrap();
    assert_eq!(r, RowRange::new(8, 12));
}

#[test]
fn range_bounds_hold_for_random_inputs() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..2_000 {
        let total_rows = rng.gen_range_usize(1, 5_000);
        let row_height = rng.gen_range_u32(1, 120);
        let viewport = rng.gen_range_u32(0, 2_000);
        let overscan = rng.gen_range_usize(0, 20);
        let max_offset = total_rows as u64 * row_height as u64 + 500;
        let offset = rng.gen_range_u64(0, max_offset);

        let r = calculate_visible_range(offset, viewport, row_height, overscan, total_rows)
            .unwrap();
        assert!(r.start_index <= r.end_index, "{r:?}");
        assert!(r.end_index <= total_rows - 1, "{r:?} total={total_rows}");
    }
}

#[test]
fn more_overscan_never_shrinks_the_range() {
    let mut rng = Lcg::new(42);
    for _ in 0..1_000 {
        let total_rows = rng.gen_range_usize(1, 2_000);
        let row_height = rng.gen_range_u32(1, 80);
        let viewport = rng.gen_range_u32(0, 1_000);
        let offset = rng.gen_range_u64(0, total_rows as u64 * row_height as u64);
        let overscan = rng.gen_range_usize(0, 10);
        let extra = rng.gen_range_usize(1, 10);

        let narrow =
            calculate_visible_range(offset, viewport, row_height, overscan, total_rows).unwrap();
        let wide = calculate_visible_range(offset, viewport, row_height, overscan + extra, total_rows)
            .unwrap();
        assert!(wide.start_index <= narrow.start_index);
        assert!(wide.end_index >= narrow.end_index);
    }
}

#[test]
fn throttle_fires_leading_call_immediately() {
    let mut t = Throttle::new(100);
    assert_eq!(t.call(1, 0), Some(1));
    assert!(!t.has_pending());
    assert_eq!(t.call(2, 100), Some(2));
}

#[test]
fn throttle_keeps_only_the_latest_deferred_value() {
    let mut t = Throttle::new(100);
    assert_eq!(t.call(10, 0), Some(10));
    assert_eq!(t.call(20, 30), None);
    assert_eq!(t.call(30, 60), None);
    assert_eq!(t.deadline_ms(), Some(100));

    assert_eq!(t.poll(99), None);
    assert_eq!(t.poll(100), Some(30));
    assert_eq!(t.poll(500), None);
    assert_eq!(t.last_fired_ms(), Some(100));
}

#[test]
fn throttle_call_after_deadline_replaces_pending() {
    let mut t = Throttle::new(100);
    t.call(1, 0);
    assert_eq!(t.call(2, 50), None);
    // The timer was never polled; a new call past the deadline fires directly.
    assert_eq!(t.call(3, 150), Some(3));
    assert!(!t.has_pending());
}

#[test]
fn throttle_cancel_and_flush() {
    let mut t = Throttle::new(100);
    t.call("a", 0);
    t.call("b", 10);
    assert_eq!(t.cancel(), Some("b"));
    assert_eq!(t.poll(1_000), None);

    t.call("c", 20);
    assert_eq!(t.flush(25), Some("c"));
    assert_eq!(t.last_fired_ms(), Some(25));
    assert_eq!(t.call("d", 50), None);
}

#[test]
fn throttle_with_zero_interval_never_defers() {
    let mut t = Throttle::new(0);
    for now in [0u64, 0, 1, 1, 2] {
        assert_eq!(t.call(now, now), Some(now));
    }
}

#[test]
fn throttle_event_on_the_deadline_supersedes_the_trailing_release() {
    let mut t = Throttle::new(100);
    assert_eq!(t.call(1, 0), Some(1));
    assert_eq!(t.call(2, 40), None);
    assert_eq!(t.deadline_ms(), Some(100));

    // Handled before the timer: the new value goes out and nothing stays parked.
    assert_eq!(t.call(3, 100), Some(3));
    assert_eq!(t.poll(100), None);
    assert!(!t.has_pending());

    // Timer first: the deadline releases the parked value and the event is deferred again.
    let mut t = Throttle::new(100);
    t.call(1, 0);
    t.call(2, 40);
    assert_eq!(t.poll(100), Some(2));
    assert_eq!(t.call(3, 100), None);
    assert_eq!(t.deadline_ms(), Some(200));
}

#[test]
fn throttle_burst_is_bounded_and_ends_on_last_value() {
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let interval = rng.gen_range_u64(1, 200);
        let n = rng.gen_range_usize(1, 100);
        let mut t = Throttle::new(interval);

        let first = rng.gen_range_u64(0, 1000);
        let mut now = first;
        let mut fired: Vec<(u64, usize)> = Vec::new();
        for value in 0..n {
            if value > 0 {
                now += rng.gen_range_u64(1, 40);
            }
            // A timer armed for an earlier deadline fires first; an event landing exactly on
            // the deadline is handled before the timer.
            if let Some(due) = t.deadline_ms().filter(|&due| due < now) {
                if let Some(v) = t.poll(due) {
                    fired.push((due, v));
                }
            }
            if let Some(v) = t.call(value, now) {
                fired.push((now, v));
            }
            assert_eq!(t.poll(now), None, "nothing is due at the instant of an event");
        }
        let duration = now - first;
        if let Some(due) = t.deadline_ms() {
            if let Some(v) = t.poll(due) {
                fired.push((due, v));
            }
        }

        assert!(
            fired.len() as u64 <= duration.div_ceil(interval) + 1,
            "interval={interval} duration={duration} fired={}",
            fired.len()
        );
        for pair in fired.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= interval, "{pair:?}");
        }
        assert_eq!(fired.last().map(|f| f.1), Some(n - 1));
    }
}

#[test]
fn plan_at_top_of_table() {
    let plan = plan_pages(RowRange::new(0, 12), 20, 1000, 2);
    assert_eq!(
        pages(&plan),
        vec![
            (0, Priority::Visible),
            (1, Priority::Adjacent),
            (2, Priority::Prefetch),
        ]
    );
}

#[test]
fn plan_in_middle_of_table() {
    let plan = plan_pages(RowRange::new(45, 62), 20, 1000, 2);
    // A taller viewport reaching row 66 still stays inside page 3.
    assert_eq!(plan, plan_pages(RowRange::new(45, 66), 20, 1000, 2));
    assert_eq!(
        pages(&plan),
        vec![
            (2, Priority::Visible),
            (3, Priority::Visible),
            (1, Priority::Adjacent),
            (4, Priority::Adjacent),
            (0, Priority::Prefetch),
            (5, Priority::Prefetch),
        ]
    );
    assert_eq!(plan.pages_with(Priority::Visible).collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn plan_with_wide_margin() {
    let plan = plan_pages(RowRange::new(200, 219), 20, 1000, 4);
    assert_eq!(plan.priority_of(10), Some(Priority::Visible));
    assert_eq!(plan.priority_of(9), Some(Priority::Adjacent));
    assert_eq!(plan.priority_of(11), Some(Priority::Adjacent));
    for p in [6, 7, 8, 12, 13, 14] {
        assert_eq!(plan.priority_of(p), Some(Priority::Prefetch), "page {p}");
    }
    assert!(!plan.contains(5));
    assert!(!plan.contains(15));
    assert_eq!(plan.len(), 9);
}

#[test]
fn plan_is_clamped_to_last_page() {
    // 105 rows / 20 = pages 0..=5, page 5 holds 5 rows.
    let plan = plan_pages(RowRange::new(95, 104), 20, 105, 3);
    assert_eq!(
        pages(&plan),
        vec![
            (4, Priority::Visible),
            (5, Priority::Visible),
            (3, Priority::Adjacent),
            (1, Priority::Prefetch),
            (2, Priority::Prefetch),
        ]
    );
}

#[test]
fn plan_with_zero_margin_keeps_adjacent_pages() {
    let plan = plan_pages(RowRange::new(40, 59), 20, 1000, 0);
    assert_eq!(
        pages(&plan),
        vec![
            (2, Priority::Visible),
            (1, Priority::Adjacent),
            (3, Priority::Adjacent),
        ]
    );
}

#[test]
fn plan_for_single_page_table() {
    let plan = plan_pages(RowRange::new(0, 9), 20, 10, 2);
    assert_eq!(pages(&plan), vec![(0, Priority::Visible)]);
}

#[test]
fn plan_properties_hold_for_random_ranges() {
    let mut rng = Lcg::new(0xfeed);
    for _ in 0..1_000 {
        let total_rows = rng.gen_range_usize(1, 3_000);
        let page_size = rng.gen_range_usize(1, 60);
        let margin = rng.gen_range_usize(0, 6);
        let start = rng.gen_range_usize(0, total_rows);
        let end = rng.gen_range_usize(start, total_rows);
        let plan = plan_pages(RowRange::new(start, end), page_size, total_rows, margin);

        let mut seen: Vec<usize> = plan.iter().map(|p| p.page_index).collect();
        let n = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), n, "duplicate page in plan");

        let max_page = (total_rows - 1) / page_size;
        assert!(seen.iter().all(|&p| p <= max_page));

        for r in start..=end {
            assert_eq!(plan.priority_of(r / page_size), Some(Priority::Visible));
        }

        let ranks: Vec<u8> = plan.iter().map(|p| p.priority.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "not sorted: {ranks:?}");
    }
}

#[test]
fn page_geometry_helpers() {
    assert_eq!(page_of_row(0, 20), 0);
    assert_eq!(page_of_row(19, 20), 0);
    assert_eq!(page_of_row(20, 20), 1);
    assert_eq!(page_count(1000, 20), 50);
    assert_eq!(page_count(1001, 20), 51);
    assert_eq!(page_row_range(2, 20, 1000), Some(RowRange::new(40, 59)));
    assert_eq!(page_row_range(5, 20, 105), Some(RowRange::new(100, 104)));
    assert_eq!(page_row_range(6, 20, 105), None);
}

#[test]
fn fetch_state_happy_path() {
    let mut s = PageStates::new();
    assert_eq!(s.state_of(3), FetchState::Unrequested);
    assert!(s.is_eligible(3));

    s.request(3).unwrap();
    assert_eq!(s.state_of(3), FetchState::Loading);
    assert_eq!(s.in_flight(), 1);
    assert!(!s.is_eligible(3));

    s.succeed(3).unwrap();
    assert_eq!(s.state_of(3), FetchState::Fetched);
    assert!(s.loading().is_empty());
    assert!(s.fetched().contains(&3));
}

#[test]
fn fetch_state_failure_and_retry() {
    let mut s = PageStates::new();
    s.request(1).unwrap();
    s.fail(1).unwrap();
    assert_eq!(s.state_of(1), FetchState::Errored);
    assert!(s.errored().contains(&1));

    s.retry(1).unwrap();
    assert_eq!(s.state_of(1), FetchState::Unrequested);
    assert!(s.errored().is_empty());
    s.request(1).unwrap();
}

#[test]
fn fetch_state_rejects_illegal_transitions() {
    let mut s = PageStates::new();
    assert_eq!(
        s.succeed(0),
        Err(TransitionError {
            page_index: 0,
            from: FetchState::Unrequested,
            to: FetchState::Fetched,
        })
    );
    assert!(s.retry(0).is_err());

    s.request(0).unwrap();
    let err = s.request(0).unwrap_err();
    assert_eq!(err.from, FetchState::Loading);

    s.succeed(0).unwrap();
    assert!(s.request(0).is_err());
    assert!(s.fail(0).is_err());
    assert_eq!(s.state_of(0), FetchState::Fetched);
}

#[test]
fn fetch_state_sets_stay_disjoint() {
    let mut rng = Lcg::new(99);
    let mut s = PageStates::new();
    for _ in 0..5_000 {
        let page = rng.gen_range_usize(0, 16);
        let _ = match rng.gen_range_u32(0, 4) {
            0 => s.request(page),
            1 => s.succeed(page),
            2 => s.fail(page),
            _ => s.retry(page),
        };
        for p in 0..16 {
            let hits = [s.loading(), s.fetched(), s.errored()]
                .iter()
                .filter(|set| set.contains(&p))
                .count();
            assert!(hits <= 1, "page {p} is in {hits} sets");
        }
    }
}

#[test]
fn fetch_state_snapshot_is_detached() {
    let mut s = PageStates::new();
    s.request(2).unwrap();
    let snap = s.snapshot();
    s.succeed(2).unwrap();
    assert!(snap.loading.contains(&2));
    assert!(snap.fetched.is_empty());
}

#[test]
fn row_store_starts_absent() {
    let store = RowStore::new(100);
    assert_eq!(store.total_rows(), 100);
    assert_eq!(store.present_count(), 0);
    let slice = store.visible_slice(RowRange::new(10, 14));
    assert_eq!(slice.len(), 5);
    assert!(slice.iter().all(Option::is_none));
}

#[test]
fn row_store_merges_at_global_offsets() {
    let mut store = RowStore::new(100);
    assert_eq!(store.merge_page(2, 20, page_rows(2, 20, 20)), 20);
    assert!(!store.is_present(39));
    assert_eq!(store.get(40).map(|r| r.id.as_str()), Some("row-40"));
    assert_eq!(store.get(59).map(|r| r.id.as_str()), Some("row-59"));
    assert!(!store.is_present(60));

    let slice = store.visible_slice(RowRange::new(38, 41));
    let ids: Vec<Option<&str>> = slice.iter().map(|r| r.map(|r| r.id.as_str())).collect();
    assert_eq!(ids, vec![None, None, Some("row-40"), Some("row-41")]);
}

#[test]
fn row_store_clips_oversized_pages() {
    let mut store = RowStore::new(105);
    // Source over-delivers: 25 rows for a 20-row page.
    assert_eq!(store.merge_page(1, 20, page_rows(1, 25, 20)), 20);
    assert!(!store.is_present(40));

    // Final page only owns rows 100..=104.
    assert_eq!(store.merge_page(5, 20, page_rows(5, 20, 20)), 5);
    assert!(store.is_present(104));
    assert_eq!(store.present_count(), 25);

    assert_eq!(store.merge_page(9, 20, page_rows(9, 20, 20)), 0);
}

#[test]
fn row_store_slice_stops_at_table_end() {
    let mut store = RowStore::new(10);
    store.merge_page(0, 10, page_rows(0, 10, 10));
    assert_eq!(store.visible_slice(RowRange::new(8, 20)).len(), 2);
    let ids: Vec<usize> = store.iter().map(|(i, _)| i).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
}

#[test]
fn options_validation() {
    assert_eq!(GridOptions::new(0).validate(), Err(ConfigError::ZeroTotalRows));
    assert_eq!(
        GridOptions::new(10).with_page_size(0).validate(),
        Err(ConfigError::ZeroPageSize)
    );
    assert_eq!(
        GridOptions::new(10).with_row_height(0).validate(),
        Err(ConfigError::ZeroRowHeight)
    );
    assert_eq!(
        GridOptions::new(10).with_max_in_flight(Some(0)).validate(),
        Err(ConfigError::ZeroMaxInFlight)
    );
    assert_eq!(GridOptions::new(10).with_max_in_flight(Some(1)).validate(), Ok(()));
    assert_eq!(GridOptions::new(10).with_container_height(0).validate(), Ok(()));
    assert_eq!(Window::new(GridOptions::new(0)).err(), Some(ConfigError::ZeroTotalRows));
}

#[test]
fn config_error_messages() {
    let msg: String = format!("{}", ConfigError::ZeroPageSize);
    assert_eq!(msg, "page_size must be greater than zero");
    let msg = format!("{}", FetchError::rejected(4, "boom"));
    assert_eq!(msg, "page 4 was rejected: boom");
}

#[test]
fn window_mounts_at_top() {
    let w = Window::new(reference_options()).unwrap();
    assert_eq!(w.scroll_offset(), 0);
    assert_eq!(w.visible_range(), RowRange::new(0, 12));
    assert_eq!(w.total_height(), 60_000);
    assert_eq!(w.max_scroll_offset(), 59_600);
    assert_eq!(w.page_count(), 50);
    assert_eq!(w.row_offset(10), Some(600));
    assert_eq!(w.row_offset(1000), None);

    let plan = w.plan();
    assert_eq!(plan.pages_with(Priority::Visible).collect::<Vec<_>>(), vec![0]);
    assert!(plan.contains(1));
    assert!(plan.contains(2));
    assert!(!plan.contains(3));
}

#[test]
fn window_throttles_scroll_bursts() {
    let mut w = Window::new(reference_options()).unwrap();

    let r = w.on_scroll(1200, 0).unwrap();
    assert_eq!(r.start_index, 15);

    assert_eq!(w.on_scroll(2000, 40), None);
    assert_eq!(w.on_scroll(3000, 80), None);
    assert!(w.has_pending_scroll());
    assert_eq!(w.deadline_ms(), Some(100));
    // The deferred update is not applied yet.
    assert_eq!(w.scroll_offset(), 1200);

    assert_eq!(w.tick(99), None);
    let r = w.tick(100).unwrap();
    assert_eq!(r, RowRange::new(45, 62));
    assert_eq!(w.scroll_offset(), 3000);
    assert!(!w.has_pending_scroll());

    let plan = w.plan();
    assert_eq!(plan.pages_with(Priority::Visible).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(plan.pages_with(Priority::Adjacent).collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(plan.pages_with(Priority::Prefetch).collect::<Vec<_>>(), vec![0, 5]);
}

#[test]
fn window_flush_applies_pending_scroll() {
    let mut w = Window::new(reference_options()).unwrap();
    w.on_scroll(0, 0);
    assert_eq!(w.on_scroll(600, 10), None);
    let r = w.flush(20).unwrap();
    assert_eq!(r.start_index, 5);
    assert_eq!(w.flush(30), None);
}

#[test]
fn window_container_resize_bypasses_throttle() {
    let mut w = Window::new(reference_options()).unwrap();
    w.on_scroll(600, 0);
    let r = w.set_container_height(1200);
    // floor(600/60)-5 = 5, ceil(1800/60)+5 = 35
    assert_eq!(r, RowRange::new(5, 35));
    assert_eq!(w.visible_range(), r);
    assert_eq!(w.range_for(0), RowRange::new(0, 25));
}

#[test]
fn document_row_count_prefers_hint() {
    let doc = TableDocument::new(page_rows(0, 3, 20));
    assert_eq!(doc.version, TableDocument::CURRENT_VERSION);
    assert_eq!(doc.row_count(), 3);

    let doc = TableDocument {
        version: 1,
        row_count_hint: 0,
        rows: page_rows(0, 7, 20),
    };
    assert_eq!(doc.row_count(), 7);
    assert_eq!(doc.grid_options().total_rows, 7);

    let doc = TableDocument {
        version: 1,
        row_count_hint: 1_000,
        rows: Vec::new(),
    };
    assert_eq!(doc.grid_options().total_rows, 1_000);
}
