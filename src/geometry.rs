//! Rectangle primitives shared by layout, windowing and tile residency
//!
//! All coordinates are `f32` in document space. A page laid out at zoom 1.0
//! and then scaled by the current zoom lives in the same space as the
//! viewport rectangle, so the two can be compared directly.

use serde::{Deserialize, Serialize};

/// Width/height pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero, negative or NaN
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Unit rectangle, the slice covering a whole page
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle with its top-left corner at `(left, top)`
    #[must_use]
    pub fn from_origin_size(left: f32, top: f32, size: Size) -> Self {
        Self::new(left, top, left + size.width, top + size.height)
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    #[must_use]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    /// Strict overlap test.
    ///
    /// Rectangles that only share an edge do not intersect, and an empty
    /// rectangle intersects nothing.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && other.left < other.right
            && other.top < other.bottom
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Multiply every edge by `factor`
    #[must_use]
    pub fn scale(&self, factor: f32) -> Rect {
        Rect::new(
            self.left * factor,
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
        )
    }

    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Map a fractional sub-rectangle (`slice` in `[0, 1]` units) into `self`
    #[must_use]
    pub fn map_slice(&self, slice: &Rect) -> Rect {
        let w = self.width();
        let h = self.height();
        Rect::new(
            self.left + slice.left * w,
            self.top + slice.top * h,
            self.left + slice.right * w,
            self.top + slice.bottom * h,
        )
    }
}
