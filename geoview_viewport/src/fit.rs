// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a world rectangle into a display rectangle.
//!
//! The fit is a pure function of the display area, the requested world
//! rectangle and the aspect mode. Screen Y points down and world Y points up,
//! so every forward transform negates the Y scale.
//!
//! ```rust
//! use geoview_viewport::fit::{FitOutcome, fit_bounds};
//! use kurbo::Rect;
//!
//! let display = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let outcome = fit_bounds(display, Rect::new(0.0, 0.0, 100.0, 50.0), true).unwrap();
//! let FitOutcome::Fitted(fit) = outcome else { unreachable!() };
//! // The extra display height is spread evenly above and below.
//! assert!((fit.bounds.y0 + 12.5).abs() < 1e-9);
//! assert!((fit.bounds.y1 - 62.5).abs() < 1e-9);
//! ```

use kurbo::Rect;

use crate::error::NonInvertibleTransform;
use crate::transform::Transform2D;

/// A successful fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    /// World rectangle that exactly covers the display.
    pub bounds: Rect,
    /// World to screen.
    pub world_to_screen: Transform2D,
    /// Screen to world.
    pub screen_to_world: Transform2D,
}

/// Result of [`fit_bounds`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitOutcome {
    /// The display and the requested rectangle both had an area.
    Fitted(Fit),
    /// The display or the requested rectangle was empty. Nothing should be
    /// shown; the request is to be retried once both have an area.
    Deferred,
}

impl FitOutcome {
    /// The forward transform, or [`Transform2D::IDENTITY`] when deferred.
    #[must_use]
    pub fn world_to_screen(&self) -> Transform2D {
        match self {
            Self::Fitted(fit) => fit.world_to_screen,
            Self::Deferred => Transform2D::IDENTITY,
        }
    }

    /// Returns `true` for [`FitOutcome::Deferred`].
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }
}

/// Returns `true` if `rect` is finite with a finite, non-zero width and
/// height. Inverted rectangles count.
#[must_use]
pub fn has_area(rect: Rect) -> bool {
    let (width, height) = (rect.width().abs(), rect.height().abs());
    rect.is_finite() && width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

/// Fits `requested` (world units) into `display` (pixels).
///
/// With `match_aspect_ratio` the scale is uniform: `requested` is centered
/// and the actual bounds grow along one axis to the display aspect ratio.
/// Without it each axis is scaled independently and the actual bounds equal
/// `requested`.
///
/// Fails only if the derived transform is degenerate, for example when the
/// requested rectangle is so small that the scale overflows.
pub fn fit_bounds(
    display: Rect,
    requested: Rect,
    match_aspect_ratio: bool,
) -> Result<FitOutcome, NonInvertibleTransform> {
    if !has_area(display) || !has_area(requested) {
        return Ok(FitOutcome::Deferred);
    }
    let display = display.abs();
    let requested = requested.abs();

    let sx = display.width() / requested.width();
    let sy = display.height() / requested.height();

    let fit = if match_aspect_ratio {
        let s = sx.min(sy);
        let dc = display.center();
        let wc = requested.center();
        let world_to_screen =
            Transform2D::new([s, 0.0, 0.0, -s, dc.x - wc.x * s, dc.y + wc.y * s]);
        let screen_to_world = world_to_screen.invert()?;
        Fit {
            bounds: screen_to_world.apply_rect(display),
            world_to_screen,
            screen_to_world,
        }
    } else {
        let world_to_screen = Transform2D::new([
            sx,
            0.0,
            0.0,
            -sy,
            display.x0 - sx * requested.x0,
            display.y0 + sy * requested.y1,
        ]);
        let screen_to_world = world_to_screen.invert()?;
        Fit {
            bounds: requested,
            world_to_screen,
            screen_to_world,
        }
    };
    Ok(FitOutcome::Fitted(fit))
}
