// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paging engine: window offset, fetch decisions, and re-centering.

use core::fmt;
use core::marker::PhantomData;
use core::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use kurbo::Point;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::source::{Notice, Waker};
use crate::util::to_index;
use crate::{Bounds, CellLayout, Completion, DataSource, HostSurface, WindowConfig, WindowStore};

/// Which end of the window a settle extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    /// Towards higher indices.
    Positive,
    /// Towards lower indices.
    Negative,
}

impl LoadDirection {
    /// Returns `true` for [`LoadDirection::Positive`].
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }

    /// Returns `true` for [`LoadDirection::Negative`].
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Negative)
    }
}

/// Outcome of [`PagingEngine::recenter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecenterReport {
    /// Window offset before recentering.
    pub old_offset: i64,
    /// Window offset after recentering.
    pub new_offset: i64,
    /// Amount the content offset moved back along the axis.
    pub scroll_delta: f64,
}

impl RecenterReport {
    /// Returns `true` if the window offset changed.
    #[must_use]
    pub const fn shifted(&self) -> bool {
        self.old_offset != self.new_offset
    }
}

/// Outcome of [`PagingEngine::on_scroll_settled`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettleReport {
    /// Direction the window was extended in.
    pub direction: LoadDirection,
    /// Range computed for the direction, before bounds clipping.
    pub fetch_range: RangeInclusive<i64>,
    /// Data source requests issued, including gap fills.
    pub requested: usize,
    /// `None` when no slot was visible.
    pub recenter: Option<RecenterReport>,
    /// Cache entries dropped by eviction.
    pub evicted: usize,
}

/// Builds a [`PagingEngine`], binding its host surface once.
pub struct PagingEngineBuilder<T, D> {
    config: WindowConfig,
    source: Option<D>,
    waker: Option<Waker>,
    _data: PhantomData<fn() -> T>,
}

impl<T, D> fmt::Debug for PagingEngineBuilder<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingEngineBuilder")
            .field("config", &self.config)
            .field("has_source", &self.source.is_some())
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

impl<T: Clone, D: DataSource<T>> PagingEngineBuilder<T, D> {
    /// Attaches `source` as soon as the engine is built.
    #[must_use]
    pub fn data_source(mut self, source: D) -> Self {
        self.source = Some(source);
        self
    }

    /// Called from the completing thread whenever an asynchronous result lands.
    ///
    /// Hosts use this to schedule [`PagingEngine::process_completions`] on
    /// their render thread.
    #[must_use]
    pub fn waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Binds the engine to `host`.
    pub fn build<H: HostSurface>(self, host: H) -> PagingEngine<T, D, H> {
        let (notify, notices) = mpsc::channel();
        let mut engine = PagingEngine {
            config: self.config,
            host,
            source: None,
            store: WindowStore::new(),
            data_offset: 0,
            needs_initial_centering: true,
            notify,
            notices,
            waker: self.waker,
        };
        if let Some(source) = self.source {
            engine.attach(source);
        }
        engine
    }
}

/// Pages data into a fixed window of render slots over an unbounded index space.
///
/// Render slot `r` shows absolute index `r + data_offset`. When the user's
/// scroll settles the engine fetches ahead in the direction of travel, moves
/// `data_offset` so the lowest visible index sits `buffer_cells` slots into
/// the window, and scrolls the host back by the same amount so nothing on
/// screen moves.
///
/// All methods run on the host's render thread. Asynchronous results arrive
/// through [`Completion`] handles from any thread; their slot reloads are
/// applied by [`process_completions`](Self::process_completions).
pub struct PagingEngine<T, D, H> {
    config: WindowConfig,
    host: H,
    source: Option<D>,
    store: WindowStore<T>,
    data_offset: i64,
    needs_initial_centering: bool,
    notify: Sender<Notice>,
    notices: Receiver<Notice>,
    waker: Option<Waker>,
}

impl<T, D, H: fmt::Debug> fmt::Debug for PagingEngine<T, D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingEngine")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("has_source", &self.source.is_some())
            .field("store", &self.store)
            .field("data_offset", &self.data_offset)
            .field("needs_initial_centering", &self.needs_initial_centering)
            .finish_non_exhaustive()
    }
}

impl<T: Clone, D: DataSource<T>> PagingEngine<T, D, ()> {
    /// Starts building an engine for `config`.
    #[must_use]
    pub fn builder(config: WindowConfig) -> PagingEngineBuilder<T, D> {
        PagingEngineBuilder {
            config,
            source: None,
            waker: None,
            _data: PhantomData,
        }
    }
}

impl<T: Clone, D: DataSource<T>, H: HostSurface> PagingEngine<T, D, H> {
    /// Window geometry.
    #[must_use]
    pub const fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// The shared data cache.
    #[must_use]
    pub const fn store(&self) -> &WindowStore<T> {
        &self.store
    }

    /// The bound host surface.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the bound host surface.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The attached data source, if any.
    #[must_use]
    pub const fn data_source(&self) -> Option<&D> {
        self.source.as_ref()
    }

    /// Mutable access to the attached data source.
    pub fn data_source_mut(&mut self) -> Option<&mut D> {
        self.source.as_mut()
    }

    /// Absolute index shown in render slot 0.
    #[must_use]
    pub const fn data_offset(&self) -> i64 {
        self.data_offset
    }

    /// Returns `true` until the first slot is displayed after an attach.
    #[must_use]
    pub const fn needs_initial_centering(&self) -> bool {
        self.needs_initial_centering
    }

    /// Slot geometry for the host's current viewport.
    #[must_use]
    pub fn layout(&self) -> CellLayout {
        CellLayout::new(&self.config, self.host.viewport())
    }

    /// Bounds declared by the attached data source.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.source
            .as_ref()
            .map_or(Bounds::UNBOUNDED, |source| Bounds::of::<T, D>(source))
    }

    /// Absolute index shown in `slot`.
    #[must_use]
    pub fn index_for_slot(&self, slot: usize) -> i64 {
        to_index(slot) + self.data_offset
    }

    /// Render slot currently showing `index`, if it is inside the window.
    #[must_use]
    pub fn slot_for_index(&self, index: i64) -> Option<usize> {
        let slot = index.checked_sub(self.data_offset)?;
        usize::try_from(slot)
            .ok()
            .filter(|&slot| slot < self.config.window_cells())
    }

    /// Absolute indices of the slots on screen, in slot order.
    #[must_use]
    pub fn visible_indices(&self) -> SmallVec<[i64; 16]> {
        let mut indices: SmallVec<[i64; 16]> = self
            .host
            .visible_slots()
            .into_iter()
            .map(|slot| self.index_for_slot(slot))
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Cached data for the index shown in `slot`.
    #[must_use]
    pub fn data_for_slot(&self, slot: usize) -> Option<T> {
        self.store.get(self.index_for_slot(slot))
    }

    /// Asks the data source to paint `slot`'s data into `cell`.
    ///
    /// Without an attached source the cell is left untouched.
    pub fn configure_slot(&mut self, slot: usize, cell: &mut D::Cell) {
        let data = self.data_for_slot(slot);
        if let Some(source) = self.source.as_mut() {
            source.configure_cell(cell, data.as_ref());
        }
    }

    /// Replaces the data source and starts over from index 0.
    ///
    /// The cache is cleared, results still in flight for the previous source
    /// are discarded, and the initial window is fetched. The host is asked to
    /// reload every slot; slots show placeholders until data lands. Returns
    /// the previous source.
    pub fn attach(&mut self, source: D) -> Option<D> {
        let previous = self.source.replace(source);
        self.reset();
        let initial = self.config.initial_fetch_range();
        let requested = self.fetch_range(initial.clone());
        debug!("attached data source, requested {requested} indices in {initial:?}");
        self.host.reload_all();
        previous
    }

    /// Removes the data source and clears the cache.
    pub fn detach(&mut self) -> Option<D> {
        let previous = self.source.take();
        self.reset();
        self.host.reload_all();
        previous
    }

    fn reset(&mut self) {
        self.store.clear();
        while self.notices.try_recv().is_ok() {}
        self.data_offset = 0;
        self.needs_initial_centering = true;
    }

    /// Tells the engine a slot is about to be displayed.
    ///
    /// The first call after an attach scrolls, without animation, so that the
    /// first visible slot is `buffer_cells` into the window. Returns `true`
    /// when that happened.
    pub fn on_slot_will_display(&mut self, slot: usize) -> bool {
        if !self.needs_initial_centering || self.source.is_none() {
            return false;
        }
        self.needs_initial_centering = false;
        let layout = self.layout();
        let axis = self.config.axis();
        let target = layout.offset_for_slot(self.config.buffer_cells());
        let current = self.host.content_offset();
        let offset = self.constrain_offset(axis.with_main(current, axis.main(target)));
        debug!(
            "initial centering on slot {} (first displayed slot {slot})",
            self.config.buffer_cells()
        );
        self.host.set_content_offset(offset);
        true
    }

    /// Direction the window should grow in for the current scroll position.
    ///
    /// Positive when the center of the viewport is past the middle of the
    /// content.
    #[must_use]
    pub fn load_direction(&self) -> LoadDirection {
        let layout = self.layout();
        let axis = self.config.axis();
        let center = axis.main(self.host.content_offset()) + axis.main_size(self.host.viewport()) / 2.0;
        if center > layout.content_extent() / 2.0 {
            LoadDirection::Positive
        } else {
            LoadDirection::Negative
        }
    }

    /// Range fetched when the window grows in `direction`.
    #[must_use]
    pub fn paging_range(&self, direction: LoadDirection) -> RangeInclusive<i64> {
        let window = self.config.window_span();
        let buffer = self.config.buffer_span();
        let (start, len) = match direction {
            LoadDirection::Positive => (self.data_offset + window, window),
            LoadDirection::Negative => (self.data_offset - buffer - 1, buffer),
        };
        start..=start + len - 1
    }

    /// Handles the end of a scroll gesture and its deceleration.
    ///
    /// Fetches ahead in the load direction, recenters, fetches any slot of the
    /// new window that was never requested, and reloads every slot. Returns
    /// `None` when nothing happened: no data source is attached, or energy
    /// saving is on and the viewport is away from both content edges.
    pub fn on_scroll_settled(&mut self) -> Option<SettleReport> {
        if self.source.is_none() {
            return None;
        }
        if self.config.energy_saving() && !self.near_content_edge() {
            trace!("settle away from content edges, skipping");
            return None;
        }

        let direction = self.load_direction();
        let fetch_range = self.paging_range(direction);
        let mut requested = self.fetch_range(fetch_range.clone());
        let recenter = self.recenter();
        requested += self.fill_window();
        let evicted = self.evict();
        self.host.reload_all();

        debug!(
            "settled {direction:?}: requested {requested}, offset {}, evicted {evicted}",
            self.data_offset
        );
        Some(SettleReport {
            direction,
            fetch_range,
            requested,
            recenter,
            evicted,
        })
    }

    fn near_content_edge(&self) -> bool {
        let layout = self.layout();
        let axis = self.config.axis();
        let viewport = axis.main_size(self.host.viewport());
        let start = axis.main(self.host.content_offset());
        let region = viewport * self.config.buffer_region_screens() as f64;
        start < region || start + viewport > layout.content_extent() - region
    }

    /// Requests every index in `range` that the refetch policy allows.
    ///
    /// The range is clipped to the data source's bounds first. Cached indices
    /// are skipped unless the config asks for refetching. Returns the number
    /// of requests issued.
    pub fn fetch_range(&mut self, range: RangeInclusive<i64>) -> usize {
        if self.source.is_none() {
            return 0;
        }
        let Some(clipped) = self.bounds().clip(range.clone()) else {
            trace!("fetch range {range:?} lies outside the data source bounds");
            return 0;
        };
        let mut requested = 0;
        for index in clipped {
            if !self.config.refetch() && self.store.contains(index) {
                continue;
            }
            self.request(index);
            requested += 1;
        }
        requested
    }

    /// Requests window indices that have never been fetched.
    fn fill_window(&mut self) -> usize {
        let window = self.data_offset..=self.data_offset + self.config.window_span() - 1;
        let Some(window) = self.bounds().clip(window) else {
            return 0;
        };
        let mut requested = 0;
        for index in window {
            if !self.store.contains(index) {
                self.request(index);
                requested += 1;
            }
        }
        requested
    }

    fn evict(&mut self) -> usize {
        let Some(windows) = self.config.eviction_margin_windows() else {
            return 0;
        };
        let margin = to_index(windows).saturating_mul(self.config.window_span());
        let start = self.data_offset.saturating_sub(margin);
        let end = (self.data_offset + self.config.window_span() - 1).saturating_add(margin);
        self.store.retain_range(start..=end)
    }

    fn request(&mut self, index: i64) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let completion = Completion::new(
            index,
            self.store.clone(),
            self.notify.clone(),
            self.waker.clone(),
        );
        let ticket = completion.ticket();
        trace!("fetching index {index}");
        let value = source.fetch(index, completion);
        self.store.apply_immediate(index, ticket, value);
    }

    /// Re-requests `index` regardless of what is cached.
    ///
    /// If the slot showing `index` is visible it is reloaded once the
    /// immediate value is stored. Returns `false` when no source is attached
    /// or `index` is outside its bounds.
    pub fn refresh(&mut self, index: i64) -> bool {
        if self.source.is_none() || !self.bounds().contains(index) {
            return false;
        }
        self.request(index);
        if let Some(slot) = self.slot_for_index(index)
            && self.host.visible_slots().contains(&slot)
        {
            self.host.reload_slot(slot);
        }
        true
    }

    /// Moves the window so the lowest visible index is `buffer_cells` slots in.
    ///
    /// The host's content offset is moved back by the same number of strides,
    /// so every visible slot keeps showing the index it showed before. Returns
    /// `None` when no slot is visible.
    pub fn recenter(&mut self) -> Option<RecenterReport> {
        let lowest = self.host.visible_slots().into_iter().min()?;
        let old_offset = self.data_offset;
        let new_offset = self.index_for_slot(lowest) - self.config.buffer_span();
        if new_offset == old_offset {
            return Some(RecenterReport {
                old_offset,
                new_offset,
                scroll_delta: 0.0,
            });
        }

        self.data_offset = new_offset;
        let axis = self.config.axis();
        let scroll_delta = (new_offset - old_offset) as f64 * self.layout().stride();
        let current = self.host.content_offset();
        self.host
            .set_content_offset(axis.with_main(current, axis.main(current) - scroll_delta));
        debug!("recentered window offset {old_offset} -> {new_offset}, scrolled back {scroll_delta}");
        Some(RecenterReport {
            old_offset,
            new_offset,
            scroll_delta,
        })
    }

    /// Applies asynchronous results that landed since the last call.
    ///
    /// Must run on the render thread. Each changed index that is currently
    /// visible gets exactly one targeted reload, however many results landed
    /// for it. Off-screen results stay in the cache without a reload. Returns
    /// the number of slots reloaded.
    pub fn process_completions(&mut self) -> usize {
        // A result can pass the store check just before a reset and queue its
        // notice after the drain.
        let generation = self.store.generation();
        let mut changed: SmallVec<[i64; 16]> = SmallVec::new();
        while let Ok((landed_in, index)) = self.notices.try_recv() {
            if landed_in == generation && !changed.contains(&index) {
                changed.push(index);
            }
        }
        if changed.is_empty() {
            return 0;
        }

        let visible = self.host.visible_slots();
        let mut reloaded = 0;
        for index in changed {
            if let Some(slot) = self.slot_for_index(index)
                && visible.contains(&slot)
            {
                self.host.reload_slot(slot);
                reloaded += 1;
            }
        }
        reloaded
    }

    /// Clamps a proposed content offset so the viewport stays within the
    /// content and never shows an index outside the data source's bounds.
    ///
    /// Hosts call this while the user scrolls. When the bounds leave less
    /// than a screen of data, the lower bound wins.
    #[must_use]
    pub fn constrain_offset(&self, proposed: Point) -> Point {
        let layout = self.layout();
        let axis = self.config.axis();
        let viewport = axis.main_size(self.host.viewport());
        let stride = layout.stride();

        let mut min = 0.0_f64;
        let mut max = (layout.content_extent() - viewport).max(0.0);
        let bounds = self.bounds();
        if let Some(upper) = bounds.upper {
            let last_slot = upper.saturating_sub(1).saturating_sub(self.data_offset) as f64;
            max = max.min(last_slot * stride + layout.cell_extent() - viewport);
        }
        if let Some(lower) = bounds.lower {
            min = min.max(lower.saturating_sub(self.data_offset) as f64 * stride);
        }
        let main = axis.main(proposed).min(max).max(min);
        axis.with_main(proposed, main)
    }
}
