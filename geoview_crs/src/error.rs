// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for CRS operations.

use thiserror::Error;

/// A bounds reprojection failed or was declined.
///
/// Callers are expected to recover from this error by keeping whatever state
/// they had before the reprojection was attempted.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ReprojectionError {
    /// No transform is known between the two systems.
    #[error("no coordinate operation from {from} to {to}")]
    Unsupported {
        /// Source CRS, as displayed.
        from: String,
        /// Target CRS, as displayed.
        to: String,
    },
    /// A coordinate lies outside the valid domain of the target system and
    /// the reprojection was not lenient.
    #[error("coordinate ({x}, {y}) lies outside the domain of {to}")]
    OutOfDomain {
        /// Offending x coordinate.
        x: f64,
        /// Offending y coordinate.
        y: f64,
        /// Target CRS, as displayed.
        to: String,
    },
    /// The operation was cancelled through its
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("reprojection was cancelled")]
    Cancelled,
    /// The input or the transformed result was not finite.
    #[error("reprojection produced non-finite coordinates")]
    NonFinite,
}

/// Map scale could not be computed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ScaleError {
    /// The extent has no area or is not finite.
    #[error("extent is empty or not finite")]
    EmptyExtent,
    /// The pixel size has a zero dimension.
    #[error("invalid pixel size {width}x{height}")]
    InvalidPixelSize {
        /// Pixel width.
        width: u32,
        /// Pixel height.
        height: u32,
    },
    /// The resolution is not a positive finite number.
    #[error("invalid resolution {0} dpi")]
    InvalidDpi(f64),
    /// Ground distances cannot be measured in this CRS.
    #[error("cannot measure ground distance in {0}")]
    UnsupportedCrs(String),
}

/// A CRS authority could not produce a system for a code.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CrsLookupError {
    /// The authority does not know the code.
    #[error("no such authority code: {0}")]
    NoSuchCode(String),
    /// The code is known but the system cannot be built.
    #[error("{code} is not supported: {reason}")]
    Unsupported {
        /// Authority code.
        code: String,
        /// Why it is not supported.
        reason: String,
    },
}
