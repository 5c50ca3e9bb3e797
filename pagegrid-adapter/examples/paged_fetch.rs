// Example: a controller fetching pages from a slow, flaky backend while the user scrolls.
use std::time::Duration;

use futures_util::FutureExt;
use pagegrid::{Cell, FetchError, GridOptions, Row};
use pagegrid_adapter::{Controller, PageEvent, RowSlot, from_fn};
use rand::Rng;

fn make_page(page_index: usize, page_size: usize) -> Vec<Row> {
    (0..page_size)
        .map(|i| {
            let index = page_index * page_size + i;
            Row::new(
                format!("row-{index}"),
                vec![
                    Cell::new("index", index as f64),
                    Cell::new("label", format!("Item {index}")),
                ],
            )
        })
        .collect()
}

#[tokio::main]
async fn main() {
    // Simulated backend: 20-150ms latency, 10% of requests fail.
    let source = from_fn(|page_index, page_size| {
        let mut rng = rand::rng();
        let delay = Duration::from_millis(rng.random_range(20..150));
        let fail = rng.random_bool(0.1);
        async move {
            tokio::time::sleep(delay).await;
            if fail {
                return Err(FetchError::rejected(page_index, "simulated outage"));
            }
            Ok(make_page(page_index, page_size))
        }
        .boxed()
    });

    let options = GridOptions::new(1000)
        .with_page_size(20)
        .with_row_height(60)
        .with_container_height(400);
    let Ok(mut c) = Controller::new(options, source) else {
        return;
    };

    let start = tokio::time::Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;

    for offset in [0u64, 1_500, 3_000, 4_500] {
        c.on_scroll(offset, now_ms());
        tokio::time::sleep(Duration::from_millis(120)).await;
        if c.deadline_ms().is_some() {
            c.tick(now_ms());
        }

        for event in c.drain_ready() {
            if let PageEvent::Failed { page_index, .. } = event {
                println!("page {page_index} failed during scroll, retrying");
                c.retry(page_index);
            }
        }
    }

    while let Some(event) = c.next_completion().await {
        match event {
            PageEvent::Fetched { page_index, rows } => {
                println!("page {page_index}: {rows} rows");
            }
            PageEvent::Failed { page_index, error } => {
                println!("page {page_index}: {error}; retrying");
                c.retry(page_index);
            }
        }
    }

    let view = c.view();
    let ready = view.slots().filter(|(_, s)| s.is_ready()).count();
    let errored = view
        .slots()
        .filter(|(_, s)| matches!(s, RowSlot::Errored { .. }))
        .count();
    println!(
        "range={:?} ready={ready} errored={errored} total_height={}",
        view.range, view.total_height
    );
}
