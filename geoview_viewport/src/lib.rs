// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geoview Viewport: the geometry engine behind a map display.
//!
//! A [`MapViewport`] keeps a consistent, invertible mapping between a
//! rectangular display surface in pixels and a world area in some coordinate
//! reference system. It provides:
//! - Display state ([`Display`]): size, DPI and compositing factors.
//! - Fit-to-extent, preserving the display aspect ratio or stretching
//!   ([`fit`]).
//! - World/screen transforms ([`Transform2D`]) and the map scale.
//! - Pan and zoom derived from the requested fit.
//! - Fine-grained change notifications ([`ViewportEvents`]).
//! - Live synchronization of two viewports ([`ViewportLink`]), for example a
//!   main map and its overview.
//! - A cross-thread command queue ([`update_queue`]).
//!
//! CRS handling is delegated to a [`CrsService`] from the `geoview_crs`
//! crate, whose main types are re-exported here.
//!
//! It does **not** render anything. Renderers read
//! [`MapViewport::world_to_screen`] (or [`MapViewport::world_to_device`])
//! and [`MapViewport::bounds`], and subscribe to changes.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use geoview_viewport::{BuiltinCrsService, Crs, MapViewport, WorldBounds};
//! use kurbo::Point;
//!
//! let mut vp = MapViewport::new(Rc::new(BuiltinCrsService::new()));
//! vp.resize(800.0, 600.0);
//!
//! // Show Europe in lon/lat. The display is wider than the extent, so the
//! // actual bounds grow horizontally.
//! vp.show_extent(WorldBounds::from_coords(-10.0, 35.0, 30.0, 70.0, Crs::wgs84_lon_lat()))
//!     .unwrap();
//! let actual = vp.bounds().unwrap();
//! assert!(actual.width() > 40.0);
//!
//! // Hit testing: the display center is the extent center.
//! let center = vp.to_world_point(Point::new(400.0, 300.0));
//! assert!((center.x - 10.0).abs() < 1e-9 && (center.y - 52.5).abs() < 1e-9);
//!
//! // Zoom in by a factor of 2 about the cursor.
//! assert!(vp.zoom_about_screen_point(Point::new(100.0, 100.0), 2.0));
//! assert!(vp.scale() > 0.0);
//! ```
//!
//! ## Threading
//!
//! A `MapViewport` is neither `Send` nor `Sync`: it is owned by one thread
//! and usually shared as `Rc<RefCell<MapViewport>>`. Other threads send
//! [`ViewportCommand`]s through an [`UpdateSender`].

mod config;
mod display;
mod error;
mod events;
pub mod fit;
mod link;
mod queue;
mod transform;
mod viewport;

pub use config::{DefectHandling, ViewportConfig};
pub use display::{DEFAULT_DPI, Display, DisplayChanges};
pub use error::{NonInvertibleTransform, ViewportError};
pub use events::{ListenerId, ViewportEvent, ViewportEvents, ViewportId, ViewportListener};
pub use link::{LinkProperties, LinkStats, ViewportLink};
pub use queue::{
    DrainReport, SendError, UpdateQueue, UpdateSender, ViewportCommand, update_queue,
};
pub use transform::Transform2D;
pub use viewport::{MapViewport, MapViewportDebugInfo, ViewportState};

pub use geoview_crs::{
    BuiltinCrsService, CancellationToken, Crs, CrsKind, CrsService, ReprojectionError,
    ScaleError, WorldBounds,
};
