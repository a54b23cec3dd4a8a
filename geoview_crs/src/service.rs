// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The CRS service consumed by map viewports, and a builtin implementation.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use kurbo::{Point, Rect};

use crate::bounds::WorldBounds;
use crate::cancel::CancellationToken;
use crate::crs::{AxisOrder, CoordinateSystem, Crs};
use crate::error::{ReprojectionError, ScaleError};

/// Metres per inch, used to turn pixel distances into display distances.
pub const METRES_PER_INCH: f64 = 0.0254;

/// WGS84 semi-major axis, the sphere radius of Web Mercator.
const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Mean earth radius (IUGG) used for great-circle distances.
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// Latitude at which Web Mercator becomes a square world.
const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the circumference covered by Web Mercator x coordinates.
const MERCATOR_HALF_WORLD: f64 = PI * MERCATOR_RADIUS;

/// Points sampled per rectangle edge when reprojecting bounds.
const EDGE_SAMPLES: usize = 8;

/// Reprojection, equivalence and scale math for coordinate reference systems.
///
/// A map viewport never decides CRS questions itself; it delegates them to
/// an implementation of this trait so that applications can plug in a full
/// projection library.
pub trait CrsService {
    /// Returns `true` if coordinates in `a` can be used as coordinates in `b`
    /// without reprojection.
    fn are_equivalent(&self, a: &Crs, b: &Crs) -> bool;

    /// Reprojects an axis-aligned rectangle from `from` to `to`, returning the
    /// axis-aligned envelope of the result.
    ///
    /// A `lenient` reprojection clamps coordinates into the target domain
    /// instead of failing. Implementations must check `cancel` and return
    /// [`ReprojectionError::Cancelled`] once it is set.
    fn reproject_bounds(
        &self,
        rect: Rect,
        from: &Crs,
        to: &Crs,
        lenient: bool,
        cancel: Option<&CancellationToken>,
    ) -> Result<Rect, ReprojectionError>;

    /// Computes the map scale denominator for `extent` shown on a display of
    /// `pixel_width` x `pixel_height` pixels at `dpi`.
    fn compute_scale(
        &self,
        extent: &WorldBounds,
        pixel_width: u32,
        pixel_height: u32,
        dpi: f64,
    ) -> Result<f64, ScaleError>;
}

/// Self-contained [`CrsService`] for the systems [`Crs`] can describe.
///
/// Supported operations:
/// - Any system to an equivalent system (no-op).
/// - Cartesian systems to cartesian systems with a different unit.
/// - Geographic WGS84 between axis orders.
/// - Geographic WGS84 to and from Web Mercator.
///
/// Scale uses great-circle distance for geographic systems and planar
/// distance for everything measured in linear units.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCrsService;

impl BuiltinCrsService {
    /// Creates the service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CrsService for BuiltinCrsService {
    fn are_equivalent(&self, a: &Crs, b: &Crs) -> bool {
        a.equivalent_ignoring_metadata(b)
    }

    fn reproject_bounds(
        &self,
        rect: Rect,
        from: &Crs,
        to: &Crs,
        lenient: bool,
        cancel: Option<&CancellationToken>,
    ) -> Result<Rect, ReprojectionError> {
        check_cancel(cancel)?;
        if !rect.is_finite() {
            return Err(ReprojectionError::NonFinite);
        }
        if self.are_equivalent(from, to) {
            return Ok(rect.abs());
        }
        let unsupported = || ReprojectionError::Unsupported {
            from: from.to_string(),
            to: to.to_string(),
        };
        let rect = rect.abs();
        let out = match (from.system(), to.system()) {
            (CoordinateSystem::Cartesian { unit: a }, CoordinateSystem::Cartesian { unit: b }) => {
                rect.scale_from_origin(a.metres() / b.metres())
            }
            (
                CoordinateSystem::Geographic { axis_order: a },
                CoordinateSystem::Geographic { axis_order: b },
            ) => {
                debug_assert_ne!(a, b, "equal geographic systems are equivalent");
                Rect::new(rect.y0, rect.x0, rect.y1, rect.x1)
            }
            (CoordinateSystem::Geographic { axis_order }, CoordinateSystem::WebMercator) => {
                envelope_of(rect, cancel, |p| {
                    let (lon, lat) = to_lon_lat(p, axis_order);
                    mercator_forward(lon, lat, lenient, to)
                })?
            }
            (CoordinateSystem::WebMercator, CoordinateSystem::Geographic { axis_order }) => {
                envelope_of(rect, cancel, |p| {
                    let (lon, lat) = mercator_inverse(p, lenient, to)?;
                    Ok(from_lon_lat(lon, lat, axis_order))
                })?
            }
            _ => return Err(unsupported()),
        };
        if out.is_finite() {
            Ok(out)
        } else {
            Err(ReprojectionError::NonFinite)
        }
    }

    fn compute_scale(
        &self,
        extent: &WorldBounds,
        pixel_width: u32,
        pixel_height: u32,
        dpi: f64,
    ) -> Result<f64, ScaleError> {
        if extent.is_empty() {
            return Err(ScaleError::EmptyExtent);
        }
        if pixel_width == 0 || pixel_height == 0 {
            return Err(ScaleError::InvalidPixelSize {
                width: pixel_width,
                height: pixel_height,
            });
        }
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ScaleError::InvalidDpi(dpi));
        }

        let rect = extent.rect();
        let ground = match extent.crs().system() {
            CoordinateSystem::Geographic { axis_order } => {
                let (lon0, lat0) = to_lon_lat(Point::new(rect.x0, rect.y0), axis_order);
                let (lon1, lat1) = to_lon_lat(Point::new(rect.x1, rect.y1), axis_order);
                great_circle_distance(lon0, lat0, lon1, lat1)
            }
            CoordinateSystem::Cartesian { unit } => rect.width().hypot(rect.height()) * unit.metres(),
            CoordinateSystem::WebMercator => rect.width().hypot(rect.height()),
            _ => return Err(ScaleError::UnsupportedCrs(extent.crs().to_string())),
        };

        let diagonal_px = f64::from(pixel_width).hypot(f64::from(pixel_height));
        let diagonal_m = diagonal_px / dpi * METRES_PER_INCH;
        Ok(ground / diagonal_m)
    }
}

fn check_cancel(cancel: Option<&CancellationToken>) -> Result<(), ReprojectionError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(ReprojectionError::Cancelled),
        _ => Ok(()),
    }
}

/// Transforms points sampled along the edges of `rect` and returns their
/// bounding box.
///
/// Sampling the edges rather than only the corners keeps the envelope tight
/// for non-linear projections.
fn envelope_of(
    rect: Rect,
    cancel: Option<&CancellationToken>,
    mut f: impl FnMut(Point) -> Result<Point, ReprojectionError>,
) -> Result<Rect, ReprojectionError> {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let steps = EDGE_SAMPLES as f64;
    for i in 0..=EDGE_SAMPLES {
        check_cancel(cancel)?;
        let t = i as f64 / steps;
        let x = rect.x0 + t * rect.width();
        let y = rect.y0 + t * rect.height();
        for p in [
            Point::new(x, rect.y0),
            Point::new(x, rect.y1),
            Point::new(rect.x0, y),
            Point::new(rect.x1, y),
        ] {
            let q = f(p)?;
            min.x = min.x.min(q.x);
            min.y = min.y.min(q.y);
            max.x = max.x.max(q.x);
            max.y = max.y.max(q.y);
        }
    }
    Ok(Rect::from_points(min, max))
}

fn to_lon_lat(p: Point, axis_order: AxisOrder) -> (f64, f64) {
    match axis_order {
        AxisOrder::EastNorth => (p.x, p.y),
        AxisOrder::NorthEast => (p.y, p.x),
    }
}

fn from_lon_lat(lon: f64, lat: f64, axis_order: AxisOrder) -> Point {
    match axis_order {
        AxisOrder::EastNorth => Point::new(lon, lat),
        AxisOrder::NorthEast => Point::new(lat, lon),
    }
}

fn mercator_forward(lon: f64, lat: f64, lenient: bool, to: &Crs) -> Result<Point, ReprojectionError> {
    let out_of_domain = lat.abs() > MERCATOR_MAX_LATITUDE || lon.abs() > 180.0;
    if out_of_domain && !lenient {
        return Err(ReprojectionError::OutOfDomain {
            x: lon,
            y: lat,
            to: to.to_string(),
        });
    }
    let lon = lon.clamp(-180.0, 180.0);
    let lat = lat.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
    let x = MERCATOR_RADIUS * lon.to_radians();
    let y = MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok(Point::new(x, y))
}

fn mercator_inverse(p: Point, lenient: bool, to: &Crs) -> Result<(f64, f64), ReprojectionError> {
    // Allow for rounding in coordinates produced by the forward projection.
    let limit = MERCATOR_HALF_WORLD * (1.0 + 1e-9);
    if (p.x.abs() > limit || p.y.abs() > limit) && !lenient {
        return Err(ReprojectionError::OutOfDomain {
            x: p.x,
            y: p.y,
            to: to.to_string(),
        });
    }
    let x = p.x.clamp(-MERCATOR_HALF_WORLD, MERCATOR_HALF_WORLD);
    let y = p.y.clamp(-MERCATOR_HALF_WORLD, MERCATOR_HALF_WORLD);
    let lon = (x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / MERCATOR_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    Ok((lon, lat))
}

/// Haversine distance in metres between two longitude/latitude positions.
fn great_circle_distance(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> f64 {
    let phi0 = lat0.to_radians();
    let phi1 = lat1.to_radians();
    let d_phi = phi1 - phi0;
    let d_lambda = (lon1 - lon0).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi0.cos() * phi1.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * a.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::{BuiltinCrsService, CrsService, MERCATOR_HALF_WORLD, great_circle_distance};
    use crate::{CancellationToken, Crs, ReprojectionError, ScaleError, WorldBounds};

    #[test]
    fn great_circle_degree_of_latitude() {
        let d = great_circle_distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn mercator_world_edges() {
        let svc = BuiltinCrsService::new();
        let out = svc
            .reproject_bounds(
                Rect::new(-180.0, -85.0, 180.0, 85.0),
                &Crs::wgs84_lon_lat(),
                &Crs::web_mercator(),
                false,
                None,
            )
            .unwrap();
        assert!((out.x0 + MERCATOR_HALF_WORLD).abs() < 1e-6);
        assert!((out.x1 - MERCATOR_HALF_WORLD).abs() < 1e-6);
        assert!(out.y1 > 19_000_000.0 && out.y1 < MERCATOR_HALF_WORLD);
        assert!((out.y0 + out.y1).abs() < 1e-6);
    }

    #[test]
    fn strict_mercator_rejects_poles_and_lenient_clamps() {
        let svc = BuiltinCrsService::new();
        let polar = Rect::new(-10.0, 80.0, 10.0, 90.0);
        let err = svc
            .reproject_bounds(polar, &Crs::wgs84_lon_lat(), &Crs::web_mercator(), false, None)
            .unwrap_err();
        assert!(matches!(err, ReprojectionError::OutOfDomain { .. }));

        let out = svc
            .reproject_bounds(polar, &Crs::wgs84_lon_lat(), &Crs::web_mercator(), true, None)
            .unwrap();
        assert!(out.y1 <= MERCATOR_HALF_WORLD + 1e-6);
    }

    #[test]
    fn mercator_round_trip_respects_axis_order() {
        let svc = BuiltinCrsService::new();
        // Latitude first: x is latitude.
        let lat_lon = Rect::new(40.0, -5.0, 45.0, 3.0);
        let merc = svc
            .reproject_bounds(lat_lon, &Crs::wgs84(), &Crs::web_mercator(), false, None)
            .unwrap();
        assert!(merc.x0 < 0.0 && merc.x1 > 0.0, "longitude maps onto x");
        let back = svc
            .reproject_bounds(merc, &Crs::web_mercator(), &Crs::wgs84(), false, None)
            .unwrap();
        assert!((back.x0 - 40.0).abs() < 1e-6);
        assert!((back.y0 + 5.0).abs() < 1e-6);
        assert!((back.x1 - 45.0).abs() < 1e-6);
        assert!((back.y1 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn axis_swap_between_geographic_orders() {
        let svc = BuiltinCrsService::new();
        let out = svc
            .reproject_bounds(
                Rect::new(1.0, 2.0, 3.0, 4.0),
                &Crs::wgs84(),
                &Crs::wgs84_lon_lat(),
                false,
                None,
            )
            .unwrap();
        assert_eq!(out, Rect::new(2.0, 1.0, 4.0, 3.0));
    }

    #[test]
    fn engineering_to_geographic_is_unsupported() {
        let svc = BuiltinCrsService::new();
        let err = svc
            .reproject_bounds(
                Rect::new(0.0, 0.0, 1.0, 1.0),
                &Crs::cartesian_2d(),
                &Crs::wgs84(),
                true,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ReprojectionError::Unsupported { .. }));
    }

    #[test]
    fn cancelled_token_wins_over_everything() {
        let svc = BuiltinCrsService::new();
        let token = CancellationToken::new();
        token.cancel();
        let err = svc
            .reproject_bounds(
                Rect::new(0.0, 0.0, 1.0, 1.0),
                &Crs::wgs84(),
                &Crs::wgs84(),
                true,
                Some(&token),
            )
            .unwrap_err();
        assert_eq!(err, ReprojectionError::Cancelled);
    }

    #[test]
    fn planar_scale() {
        let svc = BuiltinCrsService::new();
        // 1 pixel at 0.0254 dpi is exactly one metre on screen.
        let extent = WorldBounds::from_coords(0.0, 0.0, 300.0, 400.0, Crs::cartesian_2d());
        let scale = svc.compute_scale(&extent, 3, 4, 0.0254).unwrap();
        assert!((scale - 100.0).abs() < 1e-9);
    }

    #[test]
    fn scale_rejects_bad_inputs() {
        let svc = BuiltinCrsService::new();
        let extent = WorldBounds::from_coords(0.0, 0.0, 1.0, 1.0, Crs::cartesian_2d());
        assert_eq!(
            svc.compute_scale(&extent, 0, 10, 90.0),
            Err(ScaleError::InvalidPixelSize {
                width: 0,
                height: 10
            })
        );
        assert_eq!(
            svc.compute_scale(&extent, 10, 10, 0.0),
            Err(ScaleError::InvalidDpi(0.0))
        );
        let empty = WorldBounds::from_coords(0.0, 0.0, 0.0, 1.0, Crs::cartesian_2d());
        assert_eq!(
            svc.compute_scale(&empty, 10, 10, 90.0),
            Err(ScaleError::EmptyExtent)
        );
    }
}
