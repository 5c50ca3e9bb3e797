// Example: a burst of scroll events collapses into a few range recomputations.
use pagegrid::{GridOptions, Window};

fn main() {
    let Ok(mut w) = Window::new(GridOptions::new(10_000).with_throttle_interval_ms(100)) else {
        return;
    };

    // A fling: one event every 16ms for half a second.
    let mut now_ms = 0u64;
    let mut offset = 0u64;
    while now_ms <= 500 {
        if let Some(range) = w.tick(now_ms) {
            println!("t={now_ms:>3} trailing  {range:?}");
        }
        if let Some(range) = w.on_scroll(offset, now_ms) {
            println!("t={now_ms:>3} immediate {range:?}");
        }
        now_ms += 16;
        offset += 400;
    }

    // The host's timer fires once the burst is over.
    if let Some(due) = w.deadline_ms() {
        if let Some(range) = w.tick(due) {
            println!("t={due:>3} final     {range:?} (offset={})", w.scroll_offset());
        }
    }
}
