// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::crs::Crs;

/// An axis-aligned world rectangle tagged with the CRS its coordinates are
/// expressed in.
///
/// `WorldBounds` is an immutable value: operations such as
/// [`WorldBounds::union_rect`] return a new value instead of growing the
/// receiver in place. The rectangle is always stored normalized, so
/// `min_x() <= max_x()` and `min_y() <= max_y()` hold for any finite input.
/// Non-finite coordinates are kept as given and make the bounds report
/// `is_finite() == false`.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldBounds {
    rect: Rect,
    crs: Crs,
}

impl WorldBounds {
    /// Creates bounds from a rectangle, normalizing it.
    #[must_use]
    pub fn new(rect: Rect, crs: Crs) -> Self {
        Self {
            rect: normalized(rect),
            crs,
        }
    }

    /// Creates bounds from minimum and maximum coordinates.
    #[must_use]
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64, crs: Crs) -> Self {
        Self::new(Rect::new(min_x, min_y, max_x, max_y), crs)
    }

    /// The rectangle in CRS units.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The CRS of the rectangle.
    #[must_use]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Minimum x coordinate.
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.rect.x0
    }

    /// Minimum y coordinate.
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.rect.y0
    }

    /// Maximum x coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.rect.x1
    }

    /// Maximum y coordinate.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.rect.y1
    }

    /// Width in CRS units.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Height in CRS units.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Returns `true` if all four coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rect.is_finite()
    }

    /// Returns `true` if the coordinates and the width and height they span
    /// are all finite. Finite coordinates far apart can still overflow.
    #[must_use]
    pub fn has_finite_extent(&self) -> bool {
        self.is_finite() && self.rect.width().is_finite() && self.rect.height().is_finite()
    }

    /// Returns `true` if the bounds have zero width or height, or are not
    /// finite.
    ///
    /// Empty bounds never take part in transform derivation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_finite() || self.rect.width() == 0.0 || self.rect.height() == 0.0
    }

    /// Returns a copy with a different rectangle in the same CRS.
    #[must_use]
    pub fn with_rect(&self, rect: Rect) -> Self {
        Self::new(rect, self.crs.clone())
    }

    /// Returns the smallest bounds containing both `self` and `rect`.
    ///
    /// `rect` is assumed to be in the same CRS.
    #[must_use]
    pub fn union_rect(&self, rect: Rect) -> Self {
        self.with_rect(self.rect.union(normalized(rect)))
    }

    /// Returns the smallest bounds containing both `self` and `other`.
    ///
    /// `other` is assumed to be in the same CRS; the result keeps `self`'s.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.union_rect(other.rect)
    }

    /// Returns `true` if `rect` lies entirely inside these bounds, with an
    /// absolute tolerance of `eps` on every edge.
    #[must_use]
    pub fn contains_rect(&self, rect: Rect, eps: f64) -> bool {
        let rect = normalized(rect);
        rect.x0 >= self.rect.x0 - eps
            && rect.y0 >= self.rect.y0 - eps
            && rect.x1 <= self.rect.x1 + eps
            && rect.y1 <= self.rect.y1 + eps
    }
}

/// Orders the corners like `Rect::abs`, without letting `min`/`max` drop a
/// NaN coordinate.
fn normalized(rect: Rect) -> Rect {
    let (x0, x1) = if rect.x0 > rect.x1 {
        (rect.x1, rect.x0)
    } else {
        (rect.x0, rect.x1)
    };
    let (y0, y1) = if rect.y0 > rect.y1 {
        (rect.y1, rect.y0)
    } else {
        (rect.y0, rect.y1)
    };
    Rect::new(x0, y0, x1, y1)
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::WorldBounds;
    use crate::Crs;

    #[test]
    fn construction_normalizes() {
        let b = WorldBounds::from_coords(10.0, 5.0, -10.0, -5.0, Crs::cartesian_2d());
        assert_eq!(b.rect(), Rect::new(-10.0, -5.0, 10.0, 5.0));
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 10.0);
    }

    #[test]
    fn emptiness() {
        let crs = Crs::cartesian_2d();
        assert!(WorldBounds::from_coords(0.0, 0.0, 0.0, 10.0, crs.clone()).is_empty());
        assert!(WorldBounds::from_coords(0.0, 0.0, f64::NAN, 10.0, crs.clone()).is_empty());
        assert!(WorldBounds::from_coords(0.0, 0.0, f64::INFINITY, 10.0, crs.clone()).is_empty());
        assert!(!WorldBounds::from_coords(0.0, 0.0, 1.0, 1.0, crs).is_empty());
    }

    #[test]
    fn nan_coordinates_survive_normalization() {
        let b = WorldBounds::from_coords(0.0, 0.0, f64::NAN, 1.0, Crs::cartesian_2d());
        assert!(!b.is_finite());
        assert!(b.max_x().is_nan());
        let b = WorldBounds::from_coords(f64::NAN, 3.0, 1.0, -2.0, Crs::cartesian_2d());
        assert!(!b.is_finite());
        assert_eq!((b.min_y(), b.max_y()), (-2.0, 3.0));
    }

    #[test]
    fn overflowing_extent_is_not_finite() {
        let b = WorldBounds::from_coords(-1e308, -1.0, 1e308, 1.0, Crs::cartesian_2d());
        assert!(b.is_finite());
        assert!(!b.has_finite_extent());
        let b = WorldBounds::from_coords(-1.0, -1.0, 1.0, 1.0, Crs::cartesian_2d());
        assert!(b.has_finite_extent());
    }

    #[test]
    fn union_returns_new_value() {
        let a = WorldBounds::from_coords(0.0, 0.0, 1.0, 1.0, Crs::cartesian_2d());
        let b = a.union_rect(Rect::new(5.0, -2.0, 6.0, 0.5));
        assert_eq!(a.rect(), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(b.rect(), Rect::new(0.0, -2.0, 6.0, 1.0));
        assert!(b.crs().same_instance(a.crs()));
        assert!(b.contains_rect(a.rect(), 0.0));
    }
}
