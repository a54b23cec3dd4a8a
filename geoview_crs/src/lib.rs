// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geoview CRS: coordinate reference system plumbing for map viewports.
//!
//! This crate provides the CRS-facing collaborators of
//! `geoview_viewport`:
//! - [`Crs`]: a shared handle whose *identity* (same instance) is distinct
//!   from *equivalence* (same coordinate system, possibly different names).
//! - [`WorldBounds`]: an immutable rectangle tagged with its [`Crs`].
//! - [`CrsService`]: equivalence, bounds reprojection and map scale, with a
//!   self-contained [`BuiltinCrsService`].
//! - [`CancellationToken`]: cooperative cancellation for long operations.
//! - The catalog: [`CrsAuthority`], [`CatalogLoader`], [`CrsInfo`] and
//!   [`CrsRegistry`], which enumerate and classify the systems an authority
//!   knows about on a background thread.
//!
//! ## Example
//!
//! ```rust
//! use geoview_crs::{BuiltinCrsService, Crs, CrsService, WorldBounds};
//!
//! let svc = BuiltinCrsService::new();
//!
//! // Two separately built handles for WGS84 are equivalent.
//! assert!(svc.are_equivalent(&Crs::wgs84_lon_lat(), &Crs::wgs84_lon_lat()));
//!
//! // Europe in lon/lat, reprojected to Web Mercator metres.
//! let europe = WorldBounds::from_coords(-10.0, 35.0, 30.0, 70.0, Crs::wgs84_lon_lat());
//! let merc = svc
//!     .reproject_bounds(europe.rect(), europe.crs(), &Crs::web_mercator(), false, None)
//!     .unwrap();
//! assert!(merc.width() > 4_000_000.0);
//!
//! // Scale denominator of that extent on an 800x600 display at 90 dpi.
//! let scale = svc.compute_scale(&europe, 800, 600, 90.0).unwrap();
//! assert!(scale > 1_000_000.0);
//! ```

mod bounds;
mod cancel;
pub mod catalog;
mod crs;
mod error;
mod registry;
mod service;

pub use bounds::WorldBounds;
pub use cancel::CancellationToken;
pub use catalog::{
    BuiltinAuthority, CatalogEvent, CatalogLoad, CatalogLoader, CatalogOutcome, CatalogRequest,
    CrsAuthority,
};
pub use crs::{AxisOrder, CoordinateSystem, Crs, CrsDefinition, CrsKind, LinearUnit};
pub use error::{CrsLookupError, ReprojectionError, ScaleError};
pub use registry::{CrsInfo, CrsRegistry};
pub use service::{BuiltinCrsService, CrsService, METRES_PER_INCH};
