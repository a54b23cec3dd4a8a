// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use geoview_crs::ReprojectionError;
use thiserror::Error;

/// A transform could not be inverted because its determinant is zero or not
/// finite.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("transform {coefficients:?} is not invertible (determinant {determinant})")]
pub struct NonInvertibleTransform {
    /// Coefficients `[a, b, c, d, e, f]` of the offending transform.
    pub coefficients: [f64; 6],
    /// Its determinant.
    pub determinant: f64,
}

/// Errors reported by [`MapViewport`](crate::MapViewport) mutators.
///
/// Whenever one of these is returned the viewport keeps its previous state.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ViewportError {
    /// Requested bounds could not be brought into the viewport CRS.
    #[error("reprojection failed: {0}")]
    Reprojection(#[from] ReprojectionError),
    /// DPI must be finite and positive.
    #[error("invalid dpi {0}")]
    InvalidDpi(f64),
    /// Display scale factors must be finite and positive.
    #[error("invalid display scale ({sx}, {sy})")]
    InvalidDisplayScale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
    /// Display translation must be finite.
    #[error("invalid display translation ({tx}, {ty})")]
    InvalidDisplayTranslate {
        /// Horizontal offset.
        tx: f64,
        /// Vertical offset.
        ty: f64,
    },
    /// World bounds must have finite coordinates and a finite extent.
    #[error("bounds are not finite")]
    InvalidBounds,
    /// A viewport cannot be linked to itself.
    #[error("cannot link a viewport to itself")]
    SelfLink,
    /// A derived transform was degenerate.
    #[error(transparent)]
    NonInvertible(#[from] NonInvertibleTransform),
}
