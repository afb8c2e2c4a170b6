// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable window geometry for a timeline.

use core::num::NonZeroUsize;
use core::ops::RangeInclusive;

use crate::util::to_index;
use crate::{ConfigError, ScrollAxis};

/// Window geometry for a [`PagingEngine`](crate::PagingEngine).
///
/// A config is built once and never mutated. Changing the axis or buffer size
/// means building a new engine, since the slot count it derives is the fixed
/// number of render slots the host materializes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    visible_cells: NonZeroUsize,
    buffer_screens: usize,
    axis: ScrollAxis,
    refetch: bool,
    cell_spacing: f64,
    energy_saving: bool,
    buffer_region_screens: usize,
    eviction_margin_windows: Option<usize>,
}

impl WindowConfig {
    /// Starts a builder populated with the defaults.
    #[must_use]
    pub fn builder() -> WindowConfigBuilder {
        WindowConfigBuilder::default()
    }

    /// Number of cells on screen at once.
    #[must_use]
    pub const fn visible_cells(&self) -> usize {
        self.visible_cells.get()
    }

    /// Screens of cells prefetched on each side of the visible ones.
    #[must_use]
    pub const fn buffer_screens(&self) -> usize {
        self.buffer_screens
    }

    /// Scroll axis.
    #[must_use]
    pub const fn axis(&self) -> ScrollAxis {
        self.axis
    }

    /// Whether cached indices are fetched again when they come back into range.
    #[must_use]
    pub const fn refetch(&self) -> bool {
        self.refetch
    }

    /// Spacing between adjacent cells along the axis.
    #[must_use]
    pub const fn cell_spacing(&self) -> f64 {
        self.cell_spacing
    }

    /// Whether settles away from the content edges are ignored.
    #[must_use]
    pub const fn energy_saving(&self) -> bool {
        self.energy_saving
    }

    /// Viewports from either content edge within which a settle still pages
    /// when [`energy_saving`](Self::energy_saving) is on.
    #[must_use]
    pub const fn buffer_region_screens(&self) -> usize {
        self.buffer_region_screens
    }

    /// Whole windows of cached data kept on each side of the window when evicting.
    #[must_use]
    pub const fn eviction_margin_windows(&self) -> Option<usize> {
        self.eviction_margin_windows
    }

    /// Visible screen plus the buffer screens on both sides.
    #[must_use]
    pub const fn pages(&self) -> usize {
        2 * self.buffer_screens + 1
    }

    /// Slots prefetched on each side of the visible cells.
    #[must_use]
    pub const fn buffer_cells(&self) -> usize {
        self.buffer_screens * self.visible_cells.get()
    }

    /// Total render slots the host materializes.
    #[must_use]
    pub const fn window_cells(&self) -> usize {
        self.visible_cells.get() + 2 * self.buffer_cells()
    }

    /// Cells in one full page of the window; always equal to [`window_cells`](Self::window_cells).
    #[must_use]
    pub const fn page_cell_count(&self) -> usize {
        self.window_cells()
    }

    /// Indices fetched when a data source is attached.
    #[must_use]
    pub fn initial_fetch_range(&self) -> RangeInclusive<i64> {
        0..=to_index(self.pages() * self.visible_cells()) - 1
    }

    pub(crate) fn buffer_span(&self) -> i64 {
        to_index(self.buffer_cells())
    }

    pub(crate) fn window_span(&self) -> i64 {
        to_index(self.window_cells())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            visible_cells: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            buffer_screens: 3,
            axis: ScrollAxis::Vertical,
            refetch: false,
            cell_spacing: 0.0,
            energy_saving: false,
            buffer_region_screens: 1,
            eviction_margin_windows: None,
        }
    }
}

/// Builder for [`WindowConfig`].
#[derive(Debug, Clone, Copy)]
pub struct WindowConfigBuilder {
    visible_cells: usize,
    buffer_screens: usize,
    axis: ScrollAxis,
    refetch: bool,
    cell_spacing: f64,
    energy_saving: bool,
    buffer_region_screens: usize,
    eviction_margin_windows: Option<usize>,
}

impl Default for WindowConfigBuilder {
    fn default() -> Self {
        let defaults = WindowConfig::default();
        Self {
            visible_cells: defaults.visible_cells(),
            buffer_screens: defaults.buffer_screens,
            axis: defaults.axis,
            refetch: defaults.refetch,
            cell_spacing: defaults.cell_spacing,
            energy_saving: defaults.energy_saving,
            buffer_region_screens: defaults.buffer_region_screens,
            eviction_margin_windows: defaults.eviction_margin_windows,
        }
    }
}

impl WindowConfigBuilder {
    /// Cells on screen at once. Must be non-zero.
    #[must_use]
    pub const fn visible_cells(mut self, visible_cells: usize) -> Self {
        self.visible_cells = visible_cells;
        self
    }

    /// Screens prefetched on each side.
    #[must_use]
    pub const fn buffer_screens(mut self, buffer_screens: usize) -> Self {
        self.buffer_screens = buffer_screens;
        self
    }

    /// Scroll axis.
    #[must_use]
    pub const fn axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Re-ask the data source for indices that are already cached.
    #[must_use]
    pub const fn refetch(mut self, refetch: bool) -> Self {
        self.refetch = refetch;
        self
    }

    /// Spacing between cells. Must be finite and non-negative.
    #[must_use]
    pub const fn cell_spacing(mut self, cell_spacing: f64) -> Self {
        self.cell_spacing = cell_spacing;
        self
    }

    /// Only page when a settle lands within `region_screens` viewports of a content edge.
    #[must_use]
    pub const fn energy_saving(mut self, region_screens: usize) -> Self {
        self.energy_saving = true;
        self.buffer_region_screens = region_screens;
        self
    }

    /// Evict cached data more than `margin_windows` whole windows outside the window after each settle.
    #[must_use]
    pub const fn evict_beyond(mut self, margin_windows: usize) -> Self {
        self.eviction_margin_windows = Some(margin_windows);
        self
    }

    /// Validates the geometry and produces the config.
    pub fn build(self) -> Result<WindowConfig, ConfigError> {
        let visible_cells =
            NonZeroUsize::new(self.visible_cells).ok_or(ConfigError::ZeroVisibleCells)?;
        if !self.cell_spacing.is_finite() || self.cell_spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.cell_spacing));
        }
        let too_large = ConfigError::WindowTooLarge {
            visible_cells: self.visible_cells,
            buffer_screens: self.buffer_screens,
        };
        let window_cells = self
            .buffer_screens
            .checked_mul(2)
            .and_then(|b| b.checked_add(1))
            .and_then(|pages| pages.checked_mul(self.visible_cells))
            .ok_or(too_large)?;
        // Fetch ranges reach a full window past the far edge of the window.
        if i64::try_from(window_cells)
            .ok()
            .and_then(|w| w.checked_mul(3))
            .is_none()
        {
            return Err(too_large);
        }
        Ok(WindowConfig {
            visible_cells,
            buffer_screens: self.buffer_screens,
            axis: self.axis,
            refetch: self.refetch,
            cell_spacing: self.cell_spacing,
            energy_saving: self.energy_saving,
            buffer_region_screens: self.buffer_region_screens,
            eviction_margin_windows: self.eviction_margin_windows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::WindowConfig;
    use crate::{ConfigError, ScrollAxis};

    #[test]
    fn derived_geometry_for_one_buffer_screen() {
        let config = WindowConfig::builder()
            .visible_cells(5)
            .buffer_screens(1)
            .build()
            .unwrap();
        assert_eq!(config.pages(), 3);
        assert_eq!(config.buffer_cells(), 5);
        assert_eq!(config.window_cells(), 15);
        assert_eq!(config.page_cell_count(), 15);
        assert_eq!(config.initial_fetch_range(), 0..=14);
    }

    #[test]
    fn defaults_match_the_stock_timeline() {
        let config = WindowConfig::default();
        assert_eq!(config.visible_cells(), 5);
        assert_eq!(config.buffer_screens(), 3);
        assert_eq!(config.axis(), ScrollAxis::Vertical);
        assert!(!config.refetch());
        assert!(!config.energy_saving());
        assert_eq!(config.window_cells(), 35);
        assert_eq!(WindowConfig::builder().build(), Ok(config));
    }

    #[test]
    fn zero_buffer_screens_is_just_the_visible_page() {
        let config = WindowConfig::builder()
            .visible_cells(4)
            .buffer_screens(0)
            .build()
            .unwrap();
        assert_eq!(config.buffer_cells(), 0);
        assert_eq!(config.window_cells(), 4);
        assert_eq!(config.initial_fetch_range(), 0..=3);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        assert_eq!(
            WindowConfig::builder().visible_cells(0).build(),
            Err(ConfigError::ZeroVisibleCells)
        );
        assert_eq!(
            WindowConfig::builder().cell_spacing(-1.0).build(),
            Err(ConfigError::InvalidSpacing(-1.0))
        );
        assert!(matches!(
            WindowConfig::builder().cell_spacing(f64::NAN).build(),
            Err(ConfigError::InvalidSpacing(_))
        ));
        assert!(matches!(
            WindowConfig::builder()
                .visible_cells(usize::MAX / 2)
                .buffer_screens(1)
                .build(),
            Err(ConfigError::WindowTooLarge { .. })
        ));
    }
}
