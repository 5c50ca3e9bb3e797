// Example: visible range and page plan for a large table.
use pagegrid::{GridOptions, Priority, Window};

fn main() {
    let options = GridOptions::new(1_000_000)
        .with_page_size(50)
        .with_row_height(24)
        .with_container_height(600);
    let Ok(mut w) = Window::new(options) else {
        return;
    };

    println!("total_height={}", w.total_height());
    println!("initial range={:?}", w.visible_range());

    if let Some(range) = w.on_scroll(123_456 * 24, 0) {
        println!("after scroll range={range:?}");
    }
    for priority in [Priority::Visible, Priority::Adjacent, Priority::Prefetch] {
        let pages: Vec<usize> = w.plan().pages_with(priority).collect();
        println!("{priority:?}: {pages:?}");
    }
}
