// SPDX-License-Identifier: MPL-2.0
//! Pixel-snapping and rectangle helpers shared by the card and surface layouts.
//!
//! Layout happens in logical pixels with `f32` coordinates. Heights and widths
//! are rounded up and origins rounded down so that adjacent cards never end up
//! with sub-pixel seams between them.

use iced_core::{Padding, Point, Rectangle, Size};

/// Rounds a length up to the next whole pixel.
#[must_use]
pub fn ceil(value: f32) -> f32 {
    value.ceil()
}

/// Snaps a rectangle to whole pixels: origin floored, size ceiled.
#[must_use]
pub fn snap(rect: Rectangle) -> Rectangle {
    Rectangle {
        x: rect.x.floor(),
        y: rect.y.floor(),
        width: rect.width.ceil(),
        height: rect.height.ceil(),
    }
}

/// Shrinks a rectangle by the given insets, never producing a negative size.
#[must_use]
pub fn inset(rect: Rectangle, padding: Padding) -> Rectangle {
    Rectangle {
        x: rect.x + padding.left,
        y: rect.y + padding.top,
        width: (rect.width - padding.left - padding.right).max(0.0),
        height: (rect.height - padding.top - padding.bottom).max(0.0),
    }
}

/// Returns `true` when `inner` lies entirely within `outer` (edges inclusive).
#[must_use]
pub fn contains_rect(outer: Rectangle, inner: Rectangle) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.width <= outer.x + outer.width
        && inner.y + inner.height <= outer.y + outer.height
}

/// Returns `true` when `point` lies within `rect`.
///
/// Unlike [`Rectangle::contains`] the far edges are exclusive, so a point on the
/// boundary shared by two stacked cards belongs to exactly one of them.
#[must_use]
pub fn hit(rect: Rectangle, point: Point) -> bool {
    point.x >= rect.x
        && point.y >= rect.y
        && point.x < rect.x + rect.width
        && point.y < rect.y + rect.height
}

/// Builds a rectangle from an origin and a size.
#[must_use]
pub fn rect(x: f32, y: f32, size: Size) -> Rectangle {
    Rectangle {
        x,
        y,
        width: size.width,
        height: size.height,
    }
}
