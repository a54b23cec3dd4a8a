// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use crate::error::ViewportError;
use crate::transform::Transform2D;

/// Default display resolution in dots per inch.
pub const DEFAULT_DPI: f64 = 90.0;

bitflags::bitflags! {
    /// Observable [`Display`] fields changed by a setter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DisplayChanges: u8 {
        /// Width or height.
        const AREA      = 0b0001;
        /// Resolution.
        const DPI       = 0b0010;
        /// Compositing scale factors.
        const SCALE     = 0b0100;
        /// Compositing translation.
        const TRANSLATE = 0b1000;
    }
}

/// Screen-space state of a map display.
///
/// Sizes are in logical pixels with the origin at the top-left corner and Y
/// pointing down. The scale and translate factors describe how logical
/// pixels are composited onto the device (for example a device pixel ratio)
/// and do not change which world area is visible.
///
/// Every setter reports the fields it actually changed so the owner can
/// recompute its dependents.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Display {
    width: f64,
    height: f64,
    dpi: f64,
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    /// An empty display at [`DEFAULT_DPI`] with unit scale and no translation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            dpi: DEFAULT_DPI,
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Width in logical pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in logical pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Size in logical pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resolution in dots per inch.
    #[must_use]
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Compositing scale factors.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Compositing translation.
    #[must_use]
    pub fn translate(&self) -> (f64, f64) {
        (self.translate_x, self.translate_y)
    }

    /// Sets the size.
    ///
    /// Negative and non-finite dimensions are clamped to zero; layout passes
    /// routinely produce transient negative sizes.
    pub fn resize(&mut self, width: f64, height: f64) -> DisplayChanges {
        let width = clamp_dimension(width);
        let height = clamp_dimension(height);
        if width == self.width && height == self.height {
            return DisplayChanges::empty();
        }
        self.width = width;
        self.height = height;
        DisplayChanges::AREA
    }

    /// Sets the resolution. Non-positive and non-finite values are rejected.
    pub fn set_dpi(&mut self, dpi: f64) -> Result<DisplayChanges, ViewportError> {
        if !(dpi.is_finite() && dpi > 0.0) {
            return Err(ViewportError::InvalidDpi(dpi));
        }
        if dpi == self.dpi {
            return Ok(DisplayChanges::empty());
        }
        self.dpi = dpi;
        Ok(DisplayChanges::DPI)
    }

    /// Sets the compositing scale factors, which must be finite and positive.
    pub fn set_scale(&mut self, sx: f64, sy: f64) -> Result<DisplayChanges, ViewportError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(sx) && valid(sy)) {
            return Err(ViewportError::InvalidDisplayScale { sx, sy });
        }
        if (sx, sy) == (self.scale_x, self.scale_y) {
            return Ok(DisplayChanges::empty());
        }
        self.scale_x = sx;
        self.scale_y = sy;
        Ok(DisplayChanges::SCALE)
    }

    /// Sets the compositing translation, which must be finite.
    pub fn set_translate(&mut self, tx: f64, ty: f64) -> Result<DisplayChanges, ViewportError> {
        if !(tx.is_finite() && ty.is_finite()) {
            return Err(ViewportError::InvalidDisplayTranslate { tx, ty });
        }
        if (tx, ty) == (self.translate_x, self.translate_y) {
            return Ok(DisplayChanges::empty());
        }
        self.translate_x = tx;
        self.translate_y = ty;
        Ok(DisplayChanges::TRANSLATE)
    }

    /// The display rectangle `(0, 0, width, height)`.
    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// The display area rounded to whole pixels, or [`Rect::ZERO`] when empty.
    #[must_use]
    pub fn pixel_rect(&self) -> Rect {
        if self.is_empty() {
            Rect::ZERO
        } else {
            self.area().round()
        }
    }

    /// Device pixel dimensions: the size multiplied by the scale factors and
    /// rounded. These are the dimensions map scale is computed for.
    #[must_use]
    pub fn scaled_pixel_size(&self) -> (u32, u32) {
        (
            to_pixels(self.width * self.scale_x),
            to_pixels(self.height * self.scale_y),
        )
    }

    /// Logical-to-device transform built from the scale and translate factors.
    #[must_use]
    pub fn device_transform(&self) -> Transform2D {
        Transform2D::compose(
            self.scale_x,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        )
    }
}

fn clamp_dimension(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        if v != 0.0 {
            log::debug!("clamping display dimension {v} to 0");
        }
        0.0
    }
}

#[expect(clippy::cast_possible_truncation, reason = "clamped to the u32 range")]
fn to_pixels(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
