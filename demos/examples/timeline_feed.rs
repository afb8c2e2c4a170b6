// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Infinite timeline fed by a slow background source.
//!
//! This example shows how to combine:
//! - a `DataSource` that answers immediately with a placeholder entry and
//!   delivers the real one from a worker thread,
//! - a render loop that is woken by completions and applies them with
//!   `process_completions`,
//! - an `ObserverList` fanning timeline events out to listeners.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example timeline_feed`

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use kurbo::Size;
use understory_timeline::{
    Completion, DataSource, HeadlessSurface, HostSurface, ObserverList, PagingEngine,
    TimelineEvent, WindowConfig,
};

#[derive(Clone, Debug)]
struct Entry {
    index: i64,
    value: String,
}

/// Answers with the bare index right away and a resolved entry after `delay`.
struct SlowFeed {
    delay: Duration,
}

impl DataSource<Entry> for SlowFeed {
    type Cell = String;

    fn fetch(&mut self, index: i64, completion: Completion<Entry>) -> Option<Entry> {
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            completion.resolve(Some(Entry {
                index,
                value: format!("Async {index}"),
            }));
        });
        Some(Entry {
            index,
            value: index.to_string(),
        })
    }

    fn configure_cell(&mut self, cell: &mut String, data: Option<&Entry>) {
        *cell = match data {
            Some(entry) => {
                let color = if entry.index % 2 == 0 { "red" } else { "blue" };
                format!("{} ({color})", entry.value)
            }
            None => String::from("..."),
        };
    }
}

type Timeline = PagingEngine<Entry, SlowFeed, HeadlessSurface>;

fn main() {
    env_logger::init();

    let config = WindowConfig::builder()
        .visible_cells(5)
        .buffer_screens(1)
        .build()
        .expect("valid timeline geometry");
    let (wake, woken) = mpsc::channel::<()>();
    let surface = HeadlessSurface::new(&config, Size::new(320.0, 500.0));
    let mut timeline: Timeline = PagingEngine::builder(config)
        .waker(move || {
            // The render loop may already have exited.
            let _ = wake.send(());
        })
        .data_source(SlowFeed {
            delay: Duration::from_millis(40),
        })
        .build(surface);

    let mut observers = ObserverList::new();
    observers.add(|event: &TimelineEvent| log::info!("timeline event: {event:?}"));
    observers.add(|event: &TimelineEvent| {
        if let TimelineEvent::Settled(report) = event {
            println!(
                "settled {:?}, fetched {} indices around {:?}",
                report.direction, report.requested, report.fetch_range
            );
        }
    });
    observers.notify(&TimelineEvent::Attached);

    if timeline.on_slot_will_display(0) {
        observers.notify(&TimelineEvent::InitiallyCentered);
    }
    print_screen(&mut timeline);
    pump(&mut timeline, &woken, &mut observers);
    print_screen(&mut timeline);

    // One screen down twice, then all the way back past the start.
    for delta in [500.0, 500.0, -500.0, -1000.0] {
        timeline.host_mut().scroll_by(delta);
        if let Some(report) = timeline.on_scroll_settled() {
            observers.notify(&TimelineEvent::Settled(report));
        }
        print_screen(&mut timeline);
        pump(&mut timeline, &woken, &mut observers);
        print_screen(&mut timeline);
    }
}

/// Applies completions on this thread until the feed goes quiet.
fn pump(timeline: &mut Timeline, woken: &Receiver<()>, observers: &mut ObserverList) {
    while woken.recv_timeout(Duration::from_millis(200)).is_ok() {
        let reloaded = timeline.process_completions();
        if reloaded > 0 {
            observers.notify(&TimelineEvent::CompletionsApplied(reloaded));
        }
    }
}

fn print_screen(timeline: &mut Timeline) {
    let mut slots = timeline.host().visible_slots();
    slots.sort_unstable();
    let mut cell = String::new();
    let mut row = Vec::with_capacity(slots.len());
    for slot in slots {
        timeline.configure_slot(slot, &mut cell);
        row.push(cell.clone());
    }
    println!("offset {:>4} | {}", timeline.data_offset(), row.join(" | "));
    timeline.host_mut().take_reloads();
}
