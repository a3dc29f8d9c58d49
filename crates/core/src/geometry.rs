//! Axis-aligned bounding boxes and Intersection-over-Union.
//!
//! Machine detections always carry a complete [`BoundingBox`]. Reviewer
//! annotations may carry a [`PartialBoundingBox`] where individual
//! coordinates failed to parse; those are never matched geometrically.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Boxes
// ---------------------------------------------------------------------------

/// A complete bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in square pixels. Negative extents count as zero.
    pub fn area(&self) -> f64 {
        f64::from(self.width.max(0)) * f64::from(self.height.max(0))
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

/// A bounding box as submitted by a reviewer, where any coordinate may be
/// missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBoundingBox {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl PartialBoundingBox {
    /// Returns the box if all four coordinates are present.
    pub fn complete(&self) -> Option<BoundingBox> {
        Some(BoundingBox {
            x: self.x?,
            y: self.y?,
            width: self.width?,
            height: self.height?,
        })
    }

    /// Fill each missing coordinate from `fallback`.
    pub fn or_fill(&self, fallback: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x: self.x.unwrap_or(fallback.x),
            y: self.y.unwrap_or(fallback.y),
            width: self.width.unwrap_or(fallback.width),
            height: self.height.unwrap_or(fallback.height),
        }
    }

    /// True when no coordinate is present at all.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

impl From<BoundingBox> for PartialBoundingBox {
    fn from(b: BoundingBox) -> Self {
        Self {
            x: Some(b.x),
            y: Some(b.y),
            width: Some(b.width),
            height: Some(b.height),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

/// Intersection-over-Union of two boxes, in `[0.0, 1.0]`.
///
/// Disjoint boxes (including boxes that only touch along an edge) yield
/// `0.0`, as does a zero union area.
pub fn overlap(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let inter_w = a.right().min(b.right()) - i64::from(a.x).max(i64::from(b.x));
    let inter_h = a.bottom().min(b.bottom()) - i64::from(a.y).max(i64::from(b.y));
    if inter_w <= 0 || inter_h <= 0 {
        return 0.0;
    }

    let intersection = inter_w as f64 * inter_h as f64;
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        return 0.0;
    }

    (intersection / union).clamp(0.0, 1.0)
}

/// Overlap between a possibly-incomplete reviewer box and a complete box.
///
/// Returns `0.0` when any coordinate of `a` is missing.
pub fn overlap_partial(a: &PartialBoundingBox, b: &BoundingBox) -> f64 {
    match a.complete() {
        Some(a) => overlap(&a, b),
        None => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
