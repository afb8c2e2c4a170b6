// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timeline --heading-base-level=0

//! Understory Timeline: windowed paging for infinite, bidirectional lists.
//!
//! A timeline shows an unbounded sequence of items, indexed by any `i64`, in
//! a fixed number of render slots. Only a window of
//! `visible_cells + 2 * buffer_cells` slots ever exists; as the user scrolls
//! the window slides over the index space, data is fetched ahead of it, and
//! the scroll position is compensated so nothing on screen jumps.
//!
//! The core concepts are:
//!
//! - [`WindowConfig`]: immutable geometry (visible cells, buffer screens, axis,
//!   refetch policy, spacing) and the slot counts derived from it.
//! - [`WindowStore`]: a thread-safe cache from absolute index to optional data.
//! - [`DataSource`]: the host's data provider. It answers `fetch` immediately and
//!   may deliver a final value later, from any thread, through a [`Completion`].
//! - [`PagingEngine`]: owns the window offset, decides what to fetch when a
//!   scroll settles, and recenters the window.
//! - [`HostSurface`]: what the engine needs from the host's scroll view.
//!   [`CellLayout`] gives hosts the slot geometry to lay out against.
//!
//! This crate does **not** render anything. Host frameworks are responsible for:
//!
//! - Laying out [`WindowConfig::window_cells`] slots using [`CellLayout`].
//! - Calling [`PagingEngine::on_slot_will_display`] when a cell appears and
//!   [`PagingEngine::on_scroll_settled`] when scrolling and deceleration end.
//! - Painting cells through [`PagingEngine::configure_slot`].
//! - Calling [`PagingEngine::process_completions`] on the render thread when the
//!   waker registered with [`PagingEngineBuilder::waker`] fires.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_timeline::{
//!     Completion, DataSource, HeadlessSurface, PagingEngine, WindowConfig,
//! };
//!
//! struct Days;
//!
//! impl DataSource<String> for Days {
//!     type Cell = String;
//!
//!     fn fetch(&mut self, index: i64, _completion: Completion<String>) -> Option<String> {
//!         Some(format!("day {index}"))
//!     }
//!
//!     fn configure_cell(&mut self, cell: &mut String, data: Option<&String>) {
//!         *cell = data.cloned().unwrap_or_default();
//!     }
//! }
//!
//! // Five 100px cells on screen, one buffer screen on each side.
//! let config = WindowConfig::builder()
//!     .visible_cells(5)
//!     .buffer_screens(1)
//!     .build()
//!     .unwrap();
//! let surface = HeadlessSurface::new(&config, Size::new(320.0, 500.0));
//! let mut timeline: PagingEngine<String, Days, HeadlessSurface> =
//!     PagingEngine::builder(config).data_source(Days).build(surface);
//!
//! // The first displayed cell centers the window on slot 5 (index 5).
//! timeline.on_slot_will_display(0);
//! assert_eq!(timeline.visible_indices().as_slice(), &[5, 6, 7, 8, 9]);
//!
//! // Scroll a screen down and let it settle: the window follows.
//! timeline.host_mut().scroll_by(500.0);
//! let report = timeline.on_scroll_settled().unwrap();
//! assert_eq!(report.fetch_range, 15..=29);
//! assert_eq!(timeline.data_offset(), 5);
//! assert_eq!(timeline.visible_indices().as_slice(), &[10, 11, 12, 13, 14]);
//!
//! let mut cell = String::new();
//! timeline.configure_slot(5, &mut cell);
//! assert_eq!(cell, "day 10");
//! ```
//!
//! Indices may be negative; a data source limits the range with
//! [`DataSource::lower_bound`] (inclusive) and [`DataSource::upper_bound`]
//! (exclusive). Data that is not available is `None`, never an error.
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade.

mod axis;
mod config;
mod engine;
mod error;
mod headless;
mod layout;
mod observers;
mod source;
mod store;
mod surface;
mod util;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod test_support;

pub use axis::ScrollAxis;
pub use config::{WindowConfig, WindowConfigBuilder};
pub use engine::{LoadDirection, PagingEngine, PagingEngineBuilder, RecenterReport, SettleReport};
pub use error::ConfigError;
pub use headless::{HeadlessSurface, Reload};
pub use layout::CellLayout;
pub use observers::{ObserverId, ObserverList, TimelineEvent, TimelineObserver};
pub use source::{Bounds, Completion, DataSource, Waker};
pub use store::WindowStore;
pub use surface::{HostSurface, SlotList};
