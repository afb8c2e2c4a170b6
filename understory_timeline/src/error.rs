// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while building a [`WindowConfig`](crate::WindowConfig).

/// A window configuration that cannot describe a usable timeline.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// At least one cell must be visible on screen.
    #[error("visible cell count must be greater than zero")]
    ZeroVisibleCells,
    /// Cell spacing must be finite and non-negative.
    #[error("cell spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f64),
    /// The derived slot count does not fit the signed index space.
    #[error("{visible_cells} visible cells with {buffer_screens} buffer screens overflows the index space")]
    WindowTooLarge {
        /// Requested visible cell count.
        visible_cells: usize,
        /// Requested buffer screens on each side.
        buffer_screens: usize,
    },
}
