// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flow layout of the fixed slot strip along the scroll axis.

use core::ops::Range;

use kurbo::{Point, Rect, Size};

use crate::{ScrollAxis, WindowConfig};

/// Geometry of the render slots for a given viewport.
///
/// Cells split the viewport evenly along the axis so that exactly
/// `visible_cells` cells and the spacing between them fill one screen; across
/// the axis a cell spans the whole viewport. Slot `i` starts at
/// `i * stride` where the stride is the cell extent plus spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    axis: ScrollAxis,
    slots: usize,
    extent: f64,
    cross: f64,
    spacing: f64,
}

impl CellLayout {
    /// Lays out `config.window_cells()` slots for a viewport of `viewport`.
    #[must_use]
    pub fn new(config: &WindowConfig, viewport: Size) -> Self {
        let axis = config.axis();
        let visible = config.visible_cells() as f64;
        let spacing = config.cell_spacing();
        let main = axis.main_size(viewport);
        let extent = ((main - spacing * (visible - 1.0)) / visible).max(0.0);
        Self {
            axis,
            slots: config.window_cells(),
            extent,
            cross: axis.cross_size(viewport).max(0.0),
            spacing,
        }
    }

    /// Scroll axis of the strip.
    #[must_use]
    pub const fn axis(&self) -> ScrollAxis {
        self.axis
    }

    /// Number of slots in the strip.
    #[must_use]
    pub const fn slots(&self) -> usize {
        self.slots
    }

    /// Extent of a single cell along the axis.
    #[must_use]
    pub const fn cell_extent(&self) -> f64 {
        self.extent
    }

    /// Size of a single cell.
    #[must_use]
    pub const fn cell_size(&self) -> Size {
        self.axis.size(self.extent, self.cross)
    }

    /// Distance between the leading edges of adjacent slots.
    #[must_use]
    pub const fn stride(&self) -> f64 {
        self.extent + self.spacing
    }

    /// Offset of the leading edge of `slot` along the axis.
    #[must_use]
    pub fn slot_offset(&self, slot: usize) -> f64 {
        slot as f64 * self.stride()
    }

    /// Frame of `slot` in content coordinates.
    #[must_use]
    pub fn slot_rect(&self, slot: usize) -> Rect {
        Rect::from_origin_size(
            self.axis.point(self.slot_offset(slot), 0.0),
            self.cell_size(),
        )
    }

    /// Total extent of the strip along the axis.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        self.slot_offset(self.slots - 1) + self.extent
    }

    /// Size of the scrollable content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.axis.size(self.content_extent(), self.cross)
    }

    /// Content offset that puts `slot` at the leading edge of the viewport.
    #[must_use]
    pub fn offset_for_slot(&self, slot: usize) -> Point {
        self.axis.point(self.slot_offset(slot), 0.0)
    }

    /// Slot whose stride contains `offset`, clamped to the strip.
    #[must_use]
    pub fn slot_at_offset(&self, offset: f64) -> usize {
        let stride = self.stride();
        if self.slots == 0 || stride <= 0.0 {
            return 0;
        }
        let ratio = (offset / stride).floor();
        if ratio <= 0.0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Slot is clamped to the strip immediately after the cast"
        )]
        let slot = ratio as usize;
        slot.min(self.slots - 1)
    }

    /// Slots whose cell overlaps `[offset, offset + viewport_extent)`.
    ///
    /// Slots whose only presence in the range is the spacing after them are
    /// not considered visible.
    #[must_use]
    pub fn visible_slots(&self, offset: f64, viewport_extent: f64) -> Range<usize> {
        let content = self.content_extent();
        let min = offset.max(0.0);
        let max = (offset + viewport_extent.max(0.0)).min(content);
        if self.slots == 0 || self.extent <= 0.0 || max <= min {
            return 0..0;
        }

        let mut start = self.slot_at_offset(min);
        // `min` may sit in the gap after `start`.
        if self.slot_offset(start) + self.extent <= min {
            start += 1;
        }
        let mut end = start;
        while end < self.slots && self.slot_offset(end) < max {
            end += 1;
        }
        start.min(end)..end
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::CellLayout;
    use crate::{ScrollAxis, WindowConfig};

    fn config(spacing: f64, axis: ScrollAxis) -> WindowConfig {
        WindowConfig::builder()
            .visible_cells(5)
            .buffer_screens(1)
            .cell_spacing(spacing)
            .axis(axis)
            .build()
            .unwrap()
    }

    #[test]
    fn cells_split_the_viewport_along_the_axis() {
        let layout = CellLayout::new(
            &config(0.0, ScrollAxis::Vertical),
            Size::new(320.0, 500.0),
        );
        assert_eq!(layout.slots(), 15);
        assert_eq!(layout.cell_size(), Size::new(320.0, 100.0));
        assert_eq!(layout.content_size(), Size::new(320.0, 1500.0));
        assert_eq!(layout.slot_rect(2), Rect::new(0.0, 200.0, 320.0, 300.0));
        assert_eq!(layout.offset_for_slot(5), Point::new(0.0, 500.0));
    }

    #[test]
    fn spacing_is_part_of_the_stride() {
        let layout = CellLayout::new(
            &config(10.0, ScrollAxis::Horizontal),
            Size::new(540.0, 80.0),
        );
        // (540 - 4 * 10) / 5
        assert_eq!(layout.cell_extent(), 100.0);
        assert_eq!(layout.stride(), 110.0);
        assert_eq!(layout.content_extent(), 14.0 * 110.0 + 100.0);
        assert_eq!(layout.slot_rect(1), Rect::new(110.0, 0.0, 210.0, 80.0));
    }

    #[test]
    fn visible_slots_cover_partially_visible_cells() {
        let layout = CellLayout::new(
            &config(0.0, ScrollAxis::Vertical),
            Size::new(320.0, 500.0),
        );
        assert_eq!(layout.visible_slots(0.0, 500.0), 0..5);
        assert_eq!(layout.visible_slots(550.0, 500.0), 5..11);
        // Past the end, clamp to the strip.
        assert_eq!(layout.visible_slots(1200.0, 500.0), 12..15);
        assert_eq!(layout.visible_slots(0.0, 0.0), 0..0);
    }

    #[test]
    fn offsets_in_spacing_gaps_start_at_the_next_cell() {
        let layout = CellLayout::new(
            &config(10.0, ScrollAxis::Vertical),
            Size::new(100.0, 540.0),
        );
        // Slot 0 spans 0..100, gap 100..110.
        assert_eq!(layout.visible_slots(105.0, 100.0), 1..2);
        assert_eq!(layout.slot_at_offset(105.0), 0);
        assert_eq!(layout.slot_at_offset(-20.0), 0);
        assert_eq!(layout.slot_at_offset(1e9), 14);
    }
}
