// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate reference system handles.

use std::fmt;
use std::sync::Arc;

/// Broad classification of a coordinate reference system.
///
/// Only [`CrsKind::Geographic`] and [`CrsKind::Projected`] systems are
/// considered supported map display systems by the catalog; the remaining
/// kinds are still representable so that catalog listings can report them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrsKind {
    /// Local engineering (cartesian) coordinates.
    Engineering,
    /// Map projection over an ellipsoid.
    Projected,
    /// Earth-centered 3D cartesian coordinates.
    Geocentric,
    /// Latitude/longitude over an ellipsoid.
    Geographic,
    /// Image row/column coordinates.
    Image,
    /// Time axis.
    Temporal,
    /// Height or depth axis.
    Vertical,
    /// Anything the authority could not classify.
    #[default]
    Unknown,
}

impl CrsKind {
    /// Returns `true` for kinds usable as a 2D map display system.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Geographic | Self::Projected)
    }
}

/// Order of the two horizontal axes of a geographic system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisOrder {
    /// Longitude first (x = east, y = north).
    #[default]
    EastNorth,
    /// Latitude first (x = north, y = east), the EPSG authority order.
    NorthEast,
}

/// Linear unit of a cartesian system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinearUnit {
    /// SI metre.
    #[default]
    Metre,
    /// 1000 metres.
    Kilometre,
    /// International foot (0.3048 m).
    Foot,
}

impl LinearUnit {
    /// Size of one unit in metres.
    #[must_use]
    pub const fn metres(self) -> f64 {
        match self {
            Self::Metre => 1.0,
            Self::Kilometre => 1000.0,
            Self::Foot => 0.3048,
        }
    }
}

/// The coordinate system a [`CrsDefinition`] describes.
///
/// Two definitions with equal coordinate systems are equivalent, whatever
/// their names or authority codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordinateSystem {
    /// Unbounded planar cartesian coordinates.
    Cartesian {
        /// Unit of both axes.
        unit: LinearUnit,
    },
    /// WGS84 latitude/longitude in degrees.
    Geographic {
        /// Which axis comes first.
        axis_order: AxisOrder,
    },
    /// Spherical ("pseudo") Mercator over WGS84, in metres.
    WebMercator,
    /// Earth-centered cartesian coordinates.
    Geocentric,
    /// Height above a vertical datum.
    Vertical,
    /// Time axis.
    Temporal,
    /// Raster grid coordinates.
    Image,
}

impl CoordinateSystem {
    /// Classification of this coordinate system.
    #[must_use]
    pub const fn kind(self) -> CrsKind {
        match self {
            Self::Cartesian { .. } => CrsKind::Engineering,
            Self::Geographic { .. } => CrsKind::Geographic,
            Self::WebMercator => CrsKind::Projected,
            Self::Geocentric => CrsKind::Geocentric,
            Self::Vertical => CrsKind::Vertical,
            Self::Temporal => CrsKind::Temporal,
            Self::Image => CrsKind::Image,
        }
    }
}

/// Full description of a coordinate reference system.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrsDefinition {
    /// Authority code such as `EPSG:4326`, if the system has one.
    pub code: Option<String>,
    /// Human readable name.
    pub name: String,
    /// The coordinate system proper.
    pub system: CoordinateSystem,
}

/// Shared handle to a coordinate reference system.
///
/// Cloning a `Crs` is cheap and yields the same instance. Two handles can
/// describe equivalent systems without being the same instance (for example
/// two separately decoded `EPSG:4326` handles); use
/// [`Crs::equivalent_ignoring_metadata`] or a [`CrsService`](crate::CrsService)
/// to decide whether a reprojection is needed.
#[derive(Clone)]
pub struct Crs(Arc<CrsDefinition>);

impl Crs {
    /// Wraps a definition into a new handle.
    #[must_use]
    pub fn new(definition: CrsDefinition) -> Self {
        Self(Arc::new(definition))
    }

    /// Unbounded 2D cartesian engineering system in metres.
    ///
    /// This is the system a map viewport falls back to when it has nothing
    /// to show.
    #[must_use]
    pub fn cartesian_2d() -> Self {
        Self::new(CrsDefinition {
            code: None,
            name: "Cartesian 2D".into(),
            system: CoordinateSystem::Cartesian {
                unit: LinearUnit::Metre,
            },
        })
    }

    /// WGS84 in the EPSG authority axis order (latitude first).
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(CrsDefinition {
            code: Some("EPSG:4326".into()),
            name: "WGS 84".into(),
            system: CoordinateSystem::Geographic {
                axis_order: AxisOrder::NorthEast,
            },
        })
    }

    /// WGS84 with longitude first (`CRS:84`).
    #[must_use]
    pub fn wgs84_lon_lat() -> Self {
        Self::new(CrsDefinition {
            code: Some("CRS:84".into()),
            name: "WGS 84 (CRS84)".into(),
            system: CoordinateSystem::Geographic {
                axis_order: AxisOrder::EastNorth,
            },
        })
    }

    /// Spherical Web Mercator (`EPSG:3857`).
    #[must_use]
    pub fn web_mercator() -> Self {
        Self::new(CrsDefinition {
            code: Some("EPSG:3857".into()),
            name: "WGS 84 / Pseudo-Mercator".into(),
            system: CoordinateSystem::WebMercator,
        })
    }

    /// The full definition.
    #[must_use]
    pub fn definition(&self) -> &CrsDefinition {
        &self.0
    }

    /// Authority code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.0.code.as_deref()
    }

    /// Human readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The coordinate system.
    #[must_use]
    pub fn system(&self) -> CoordinateSystem {
        self.0.system
    }

    /// Classification of the coordinate system.
    #[must_use]
    pub fn kind(&self) -> CrsKind {
        self.0.system.kind()
    }

    /// Returns `true` if both handles point at the same instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns `true` if both handles describe the same coordinate system,
    /// ignoring names and authority codes.
    #[must_use]
    pub fn equivalent_ignoring_metadata(&self, other: &Self) -> bool {
        self.same_instance(other) || self.0.system == other.0.system
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.0 == other.0
    }
}

impl Eq for Crs {}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crs")
            .field("code", &self.0.code)
            .field("name", &self.0.name)
            .field("system", &self.0.system)
            .finish()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.code {
            Some(code) => f.write_str(code),
            None => f.write_str(&self.0.name),
        }
    }
}

impl From<CrsDefinition> for Crs {
    fn from(definition: CrsDefinition) -> Self {
        Self::new(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisOrder, CoordinateSystem, Crs, CrsDefinition, CrsKind};

    #[test]
    fn separately_built_handles_are_equivalent_but_distinct() {
        let a = Crs::wgs84();
        let b = Crs::wgs84();
        assert!(!a.same_instance(&b));
        assert!(a.equivalent_ignoring_metadata(&b));
        assert_eq!(a, b);
        assert!(a.same_instance(&a.clone()));
    }

    #[test]
    fn equivalence_ignores_names_and_codes() {
        let renamed = Crs::new(CrsDefinition {
            code: Some("EPSG:900913".into()),
            name: "Google Mercator".into(),
            system: CoordinateSystem::WebMercator,
        });
        let mercator = Crs::web_mercator();
        assert!(renamed.equivalent_ignoring_metadata(&mercator));
        assert_ne!(renamed, mercator);
    }

    #[test]
    fn axis_order_distinguishes_geographic_systems() {
        assert!(!Crs::wgs84().equivalent_ignoring_metadata(&Crs::wgs84_lon_lat()));
        assert_eq!(
            Crs::wgs84().system(),
            CoordinateSystem::Geographic {
                axis_order: AxisOrder::NorthEast
            }
        );
    }

    #[test]
    fn kinds_and_display() {
        assert_eq!(Crs::cartesian_2d().kind(), CrsKind::Engineering);
        assert_eq!(Crs::web_mercator().kind(), CrsKind::Projected);
        assert!(Crs::wgs84().kind().is_supported());
        assert!(!CrsKind::Vertical.is_supported());
        assert_eq!(Crs::web_mercator().to_string(), "EPSG:3857");
        assert_eq!(Crs::cartesian_2d().to_string(), "Cartesian 2D");
    }
}
