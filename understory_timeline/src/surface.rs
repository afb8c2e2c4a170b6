// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render surface a [`PagingEngine`](crate::PagingEngine) drives.

use kurbo::{Point, Size};
use smallvec::SmallVec;

/// Render slots currently on screen, in any order.
pub type SlotList = SmallVec<[usize; 16]>;

/// What the engine needs from the host's scrollable grid or list.
///
/// The host owns cell recycling, layout, and scroll physics. It lays out
/// [`WindowConfig::window_cells`](crate::WindowConfig::window_cells) slots using
/// [`CellLayout`](crate::CellLayout) and reports back which of them are on
/// screen. All methods are called from the render thread.
pub trait HostSurface {
    /// Size of the visible viewport.
    fn viewport(&self) -> Size;

    /// Current scroll position in content coordinates.
    fn content_offset(&self) -> Point;

    /// Jumps to `offset` without animation.
    fn set_content_offset(&mut self, offset: Point);

    /// Render slots that currently have a cell on screen.
    fn visible_slots(&self) -> SlotList;

    /// Re-configures the cell for `slot` only.
    fn reload_slot(&mut self, slot: usize);

    /// Re-configures every slot.
    fn reload_all(&mut self);
}
