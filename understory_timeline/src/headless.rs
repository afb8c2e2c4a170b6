// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`HostSurface`] for tests, demos, and hosts without a view system.

use core::ops::Range;

use kurbo::{Point, Size};

use crate::{CellLayout, HostSurface, SlotList, WindowConfig};

/// A reload request recorded by [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    /// A single slot was reloaded.
    Slot(usize),
    /// Every slot was reloaded.
    All,
}

/// Scroll state and reload log for a strip of slots with no views behind it.
///
/// Visibility is derived from [`CellLayout::visible_slots`], so any slot whose
/// cell overlaps the viewport counts as visible.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    layout: CellLayout,
    viewport: Size,
    offset: Point,
    reloads: Vec<Reload>,
}

impl HeadlessSurface {
    /// Creates a surface for `config` scrolled to the start of the strip.
    #[must_use]
    pub fn new(config: &WindowConfig, viewport: Size) -> Self {
        Self {
            layout: CellLayout::new(config, viewport),
            viewport,
            offset: Point::ZERO,
            reloads: Vec::new(),
        }
    }

    /// Layout the surface derives visibility from.
    #[must_use]
    pub const fn layout(&self) -> &CellLayout {
        &self.layout
    }

    /// Current offset along the scroll axis.
    #[must_use]
    pub const fn scroll_position(&self) -> f64 {
        self.layout.axis().main(self.offset)
    }

    /// Simulates a user scroll to `position`, clamped to the content.
    pub fn scroll_to(&mut self, position: f64) {
        let axis = self.layout.axis();
        let max = (self.layout.content_extent() - axis.main_size(self.viewport)).max(0.0);
        self.offset = axis.with_main(self.offset, position.clamp(0.0, max));
    }

    /// Simulates a user scroll by `delta` along the axis.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_position() + delta);
    }

    /// Visible slots as a contiguous range.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let axis = self.layout.axis();
        self.layout
            .visible_slots(axis.main(self.offset), axis.main_size(self.viewport))
    }

    /// Reloads requested so far.
    #[must_use]
    pub fn reloads(&self) -> &[Reload] {
        &self.reloads
    }

    /// Returns and forgets the reloads requested so far.
    pub fn take_reloads(&mut self) -> Vec<Reload> {
        core::mem::take(&mut self.reloads)
    }
}

impl HostSurface for HeadlessSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    fn visible_slots(&self) -> SlotList {
        self.visible_range().collect()
    }

    fn reload_slot(&mut self, slot: usize) {
        self.reloads.push(Reload::Slot(slot));
    }

    fn reload_all(&mut self) {
        self.reloads.push(Reload::All);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::{HeadlessSurface, Reload};
    use crate::{HostSurface, ScrollAxis, WindowConfig};

    #[test]
    fn user_scrolling_is_clamped_to_content() {
        let config = WindowConfig::builder()
            .visible_cells(4)
            .buffer_screens(1)
            .axis(ScrollAxis::Horizontal)
            .build()
            .unwrap();
        let mut surface = HeadlessSurface::new(&config, Size::new(400.0, 60.0));
        // 12 slots of 100 → 1200 content, 400 viewport.
        surface.scroll_by(-50.0);
        assert_eq!(surface.scroll_position(), 0.0);
        surface.scroll_to(5000.0);
        assert_eq!(surface.scroll_position(), 800.0);
        assert_eq!(surface.visible_range(), 8..12);
        assert_eq!(surface.content_offset().y, 0.0);
    }

    #[test]
    fn reloads_are_recorded_in_order() {
        let config = WindowConfig::default();
        let mut surface = HeadlessSurface::new(&config, Size::new(100.0, 500.0));
        surface.reload_all();
        surface.reload_slot(3);
        assert_eq!(surface.reloads(), &[Reload::All, Reload::Slot(3)]);
        assert_eq!(surface.take_reloads().len(), 2);
        assert!(surface.reloads().is_empty());
    }
}
