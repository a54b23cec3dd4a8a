// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::error::NonInvertibleTransform;

/// Immutable 2x3 affine transform.
///
/// Coefficients are `[a, b, c, d, e, f]` with
/// `x' = a·x + c·y + e` and `y' = b·x + d·y + f`, which is the layout of
/// [`kurbo::Affine`].
///
/// Transforms produced by a [`MapViewport`](crate::MapViewport) are always
/// invertible except for [`Transform2D::IDENTITY`], which stands in for
/// "nothing to show".
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 6]", into = "[f64; 6]"))]
pub struct Transform2D(Affine);

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Returns [`Transform2D::IDENTITY`].
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a transform from its coefficients `[a, b, c, d, e, f]`.
    #[must_use]
    pub const fn new(coefficients: [f64; 6]) -> Self {
        Self(Affine::new(coefficients))
    }

    /// Axis-aligned scale followed by a translation.
    #[must_use]
    pub const fn compose(scale_x: f64, scale_y: f64, translate_x: f64, translate_y: f64) -> Self {
        Self::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
    }

    /// Transform that applies `self` first and then `other`.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self(other.0 * self.0)
    }

    /// The inverse transform.
    ///
    /// Fails if the determinant is zero or not finite.
    pub fn invert(self) -> Result<Self, NonInvertibleTransform> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(NonInvertibleTransform {
                coefficients: self.coefficients(),
                determinant,
            });
        }
        let inverse = self.0.inverse();
        if inverse.is_finite() {
            Ok(Self(inverse))
        } else {
            Err(NonInvertibleTransform {
                coefficients: self.coefficients(),
                determinant,
            })
        }
    }

    /// Transforms a point.
    #[must_use]
    pub fn apply_point(self, point: Point) -> Point {
        self.0 * point
    }

    /// Transforms the four corners of `rect` and returns their axis-aligned
    /// bounding box.
    #[must_use]
    pub fn apply_rect(self, rect: Rect) -> Rect {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
        ]
        .map(|p| self.0 * p);
        let mut out = Rect::from_points(corners[0], corners[1]);
        out = out.union_pt(corners[2]);
        out.union_pt(corners[3])
    }

    /// Transforms a vector by the linear part only.
    #[must_use]
    pub fn apply_vector(self, vector: Vec2) -> Vec2 {
        let [a, b, c, d, _, _] = self.0.as_coeffs();
        Vec2::new(a * vector.x + c * vector.y, b * vector.x + d * vector.y)
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(self) -> f64 {
        self.0.determinant()
    }

    /// Returns `true` for exactly the identity coefficients.
    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Coefficients `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn coefficients(self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// The equivalent [`kurbo::Affine`].
    #[must_use]
    pub fn to_affine(self) -> Affine {
        self.0
    }

    /// Returns `true` if every coefficient is within `eps` of `other`'s.
    #[must_use]
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        self.coefficients()
            .iter()
            .zip(other.coefficients())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for Transform2D {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl From<Transform2D> for Affine {
    fn from(transform: Transform2D) -> Self {
        transform.0
    }
}

impl From<[f64; 6]> for Transform2D {
    fn from(coefficients: [f64; 6]) -> Self {
        Self::new(coefficients)
    }
}

impl From<Transform2D> for [f64; 6] {
    fn from(transform: Transform2D) -> Self {
        transform.coefficients()
    }
}

impl fmt::Debug for Transform2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, f_] = self.coefficients();
        write!(f, "Transform2D([{a}, {b}, {c}, {d}, {e}, {f_}])")
    }
}
