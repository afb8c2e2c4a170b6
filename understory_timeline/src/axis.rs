// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll axis helpers for projecting `kurbo` geometry onto a 1D strip.

use kurbo::{Point, Size, Vec2};

/// The axis a timeline scrolls along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    /// Slots flow left to right.
    Horizontal,
    /// Slots flow top to bottom.
    #[default]
    Vertical,
}

impl ScrollAxis {
    /// Returns `true` for [`ScrollAxis::Horizontal`].
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// Returns `true` for [`ScrollAxis::Vertical`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }

    /// Component of `point` along the scroll axis.
    #[must_use]
    pub const fn main(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Component of `size` along the scroll axis.
    #[must_use]
    pub const fn main_size(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Component of `size` across the scroll axis.
    #[must_use]
    pub const fn cross_size(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Builds a point from its main and cross components.
    #[must_use]
    pub const fn point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// Builds a size from its main and cross components.
    #[must_use]
    pub const fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// A vector of length `delta` pointing along the scroll axis.
    #[must_use]
    pub const fn vec(self, delta: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(delta, 0.0),
            Self::Vertical => Vec2::new(0.0, delta),
        }
    }

    /// Replaces the main component of `point`, keeping the cross component.
    #[must_use]
    pub const fn with_main(self, point: Point, main: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, point.y),
            Self::Vertical => Point::new(point.x, main),
        }
    }
}
