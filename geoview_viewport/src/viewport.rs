// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use geoview_crs::{CancellationToken, Crs, CrsService, WorldBounds};
use kurbo::{Point, Rect, Vec2};

use crate::config::ViewportConfig;
use crate::display::Display;
use crate::error::{NonInvertibleTransform, ViewportError};
use crate::events::{ListenerId, Listeners, ViewportEvent, ViewportEvents, ViewportId};
use crate::fit::{FitOutcome, fit_bounds, has_area};
use crate::transform::Transform2D;

/// Lifecycle state of a [`MapViewport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewportState {
    /// The viewport has never had both a non-empty display and a non-empty
    /// requested fit.
    #[default]
    Uninitialized,
    /// World bounds are shown on the display.
    Ready,
    /// The viewport was ready once, but the display or the requested fit is
    /// currently empty.
    Empty,
}

/// Everything a mutation can change directly.
#[derive(Clone, Debug)]
struct Inputs {
    display: Display,
    crs: Crs,
    requested_fit: Option<WorldBounds>,
    match_aspect_ratio: bool,
}

/// Everything derived from [`Inputs`].
#[derive(Clone, Debug)]
struct Derived {
    state: ViewportState,
    bounds: Option<WorldBounds>,
    world_to_screen: Transform2D,
    screen_to_world: Transform2D,
    scale: f64,
}

impl Derived {
    /// Nothing to show. The last actual bounds are kept unless `clear`.
    fn idle(previous: &Self, clear: bool) -> Self {
        Self {
            state: match previous.state {
                ViewportState::Uninitialized => ViewportState::Uninitialized,
                ViewportState::Ready | ViewportState::Empty => ViewportState::Empty,
            },
            bounds: if clear { None } else { previous.bounds.clone() },
            world_to_screen: Transform2D::IDENTITY,
            screen_to_world: Transform2D::IDENTITY,
            scale: -1.0,
        }
    }
}

/// Map viewport: the mapping between a display surface in pixels and a world
/// area in some coordinate reference system.
///
/// A `MapViewport` owns its [`Display`], the current [`Crs`], the requested
/// fit (the last "show this extent" request) and everything derived from
/// them: the actual world bounds, the world/screen transforms and the map
/// scale. Derived state is recomputed synchronously by every mutator, before
/// any listener is notified, so queries never observe a half-updated
/// viewport.
///
/// CRS questions (equivalence, reprojection and scale) are delegated to a
/// [`CrsService`].
///
/// ```rust
/// use std::rc::Rc;
/// use geoview_crs::{BuiltinCrsService, Crs, WorldBounds};
/// use geoview_viewport::{MapViewport, ViewportState};
/// use kurbo::Point;
///
/// let mut vp = MapViewport::new(Rc::new(BuiltinCrsService::new()));
/// vp.resize(800.0, 600.0);
/// vp.show_extent(WorldBounds::from_coords(0.0, 0.0, 100.0, 50.0, Crs::cartesian_2d()))
///     .unwrap();
/// assert_eq!(vp.state(), ViewportState::Ready);
///
/// // World Y points up, screen Y points down.
/// let top = vp.to_screen_point(Point::new(50.0, 50.0));
/// let bottom = vp.to_screen_point(Point::new(50.0, 0.0));
/// assert!(top.y < bottom.y);
/// ```
pub struct MapViewport {
    id: ViewportId,
    config: ViewportConfig,
    service: Rc<dyn CrsService>,
    inputs: Inputs,
    derived: Derived,
    listeners: Listeners,
}

impl MapViewport {
    /// Creates an empty viewport with the default configuration and the
    /// cartesian engineering CRS.
    #[must_use]
    pub fn new(service: Rc<dyn CrsService>) -> Self {
        Self::with_config(service, ViewportConfig::default())
    }

    /// Creates an empty viewport with `config`.
    ///
    /// An invalid [`ViewportConfig::dpi`] is ignored in favor of the default.
    #[must_use]
    pub fn with_config(service: Rc<dyn CrsService>, config: ViewportConfig) -> Self {
        let mut display = Display::new();
        if let Err(err) = display.set_dpi(config.dpi) {
            log::warn!("ignoring configured dpi: {err}");
        }
        Self {
            id: ViewportId::next(),
            config,
            service,
            inputs: Inputs {
                display,
                crs: Crs::cartesian_2d(),
                requested_fit: None,
                match_aspect_ratio: config.match_aspect_ratio,
            },
            derived: Derived {
                state: ViewportState::Uninitialized,
                bounds: None,
                world_to_screen: Transform2D::IDENTITY,
                screen_to_world: Transform2D::IDENTITY,
                scale: -1.0,
            },
            listeners: Listeners::default(),
        }
    }

    /// Process-unique identity of this viewport.
    #[must_use]
    pub fn id(&self) -> ViewportId {
        self.id
    }

    /// Configuration this viewport was created with.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The CRS service.
    #[must_use]
    pub fn service(&self) -> &Rc<dyn CrsService> {
        &self.service
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.derived.state
    }

    /// Returns `true` unless the viewport is [`ViewportState::Ready`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derived.state != ViewportState::Ready
    }

    /// Returns `true` if a non-empty fit is waiting for the display to get
    /// an area. It is applied by the next [`MapViewport::resize`] that makes
    /// the display non-empty.
    #[must_use]
    pub fn has_pending_fit(&self) -> bool {
        self.inputs.display.is_empty()
            && self
                .inputs
                .requested_fit
                .as_ref()
                .is_some_and(|fit| !fit.is_empty())
    }

    /// Display state.
    #[must_use]
    pub fn display(&self) -> &Display {
        &self.inputs.display
    }

    /// Current CRS.
    #[must_use]
    pub fn crs(&self) -> &Crs {
        &self.inputs.crs
    }

    /// The last requested fit, in the viewport CRS.
    #[must_use]
    pub fn requested_fit(&self) -> Option<&WorldBounds> {
        self.inputs.requested_fit.as_ref()
    }

    /// Actual world bounds covering the display.
    ///
    /// While the viewport is [`ViewportState::Empty`] these are the bounds
    /// last shown; they are cleared by [`MapViewport::reset`].
    #[must_use]
    pub fn bounds(&self) -> Option<&WorldBounds> {
        self.derived.bounds.as_ref()
    }

    /// Whether fits preserve the display aspect ratio.
    #[must_use]
    pub fn match_aspect_ratio(&self) -> bool {
        self.inputs.match_aspect_ratio
    }

    /// Map scale denominator, or `-1.0` when the viewport is not ready or the
    /// scale cannot be computed.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.derived.scale
    }

    /// World to screen transform, identity when not ready.
    #[must_use]
    pub fn world_to_screen(&self) -> Transform2D {
        self.derived.world_to_screen
    }

    /// Screen to world transform, identity when not ready.
    #[must_use]
    pub fn screen_to_world(&self) -> Transform2D {
        self.derived.screen_to_world
    }

    /// World to device transform: [`MapViewport::world_to_screen`] followed
    /// by the display compositing factors. Identity when not ready.
    #[must_use]
    pub fn world_to_device(&self) -> Transform2D {
        if self.is_empty() {
            Transform2D::IDENTITY
        } else {
            self.derived
                .world_to_screen
                .then(self.inputs.display.device_transform())
        }
    }

    /// Converts a world point into screen coordinates.
    #[must_use]
    pub fn to_screen_point(&self, point: Point) -> Point {
        self.derived.world_to_screen.apply_point(point)
    }

    /// Converts a screen point into world coordinates.
    #[must_use]
    pub fn to_world_point(&self, point: Point) -> Point {
        self.derived.screen_to_world.apply_point(point)
    }

    /// Converts a world rectangle into the screen rectangle covering it.
    #[must_use]
    pub fn to_screen_rect(&self, rect: Rect) -> Rect {
        self.derived.world_to_screen.apply_rect(rect)
    }

    /// Converts a screen rectangle into the world rectangle covering it.
    #[must_use]
    pub fn to_world_rect(&self, rect: Rect) -> Rect {
        self.derived.screen_to_world.apply_rect(rect)
    }

    /// Converts bounds in any CRS into screen coordinates, reprojecting them
    /// into the viewport CRS first if needed.
    pub fn to_screen_bounds(&self, bounds: &WorldBounds) -> Result<Rect, ViewportError> {
        let rect = self.rect_in_crs(bounds, None)?;
        Ok(self.to_screen_rect(rect))
    }

    /// Expresses `bounds` in the viewport CRS.
    ///
    /// Equivalent CRSs are never reprojected. Other reprojections are
    /// lenient and honor `cancel`. Bounds with non-finite coordinates or an
    /// extent that overflows are rejected as [`ViewportError::InvalidBounds`].
    pub fn rect_in_crs(
        &self,
        bounds: &WorldBounds,
        cancel: Option<&CancellationToken>,
    ) -> Result<Rect, ViewportError> {
        self.rect_in(bounds, &self.inputs.crs, cancel)
    }

    /// Expresses `bounds` in `crs` through this viewport's service.
    pub(crate) fn rect_in(
        &self,
        bounds: &WorldBounds,
        crs: &Crs,
        cancel: Option<&CancellationToken>,
    ) -> Result<Rect, ViewportError> {
        if !bounds.has_finite_extent() {
            return Err(ViewportError::InvalidBounds);
        }
        if self.service.are_equivalent(bounds.crs(), crs) {
            return Ok(bounds.rect());
        }
        self.service
            .reproject_bounds(bounds.rect(), bounds.crs(), crs, true, cancel)
            .map_err(Into::into)
    }

    /// Registers `callback` for changes intersecting `mask`.
    pub fn subscribe(
        &mut self,
        mask: ViewportEvents,
        callback: impl FnMut(&ViewportEvent) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(mask, Box::new(callback))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Resizes the display. Negative and non-finite sizes are clamped to 0.
    ///
    /// Returns `true` if the size changed. A fit requested while the display
    /// was empty is applied as soon as the display gets an area.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let mut next = self.inputs.clone();
        if next.display.resize(width, height).is_empty() {
            return false;
        }
        self.apply(next).is_ok()
    }

    /// Sets the display resolution.
    pub fn set_dpi(&mut self, dpi: f64) -> Result<(), ViewportError> {
        let mut next = self.inputs.clone();
        if next.display.set_dpi(dpi)?.is_empty() {
            return Ok(());
        }
        self.apply(next)?;
        Ok(())
    }

    /// Sets the display compositing scale factors.
    pub fn set_display_scale(&mut self, sx: f64, sy: f64) -> Result<(), ViewportError> {
        let mut next = self.inputs.clone();
        if next.display.set_scale(sx, sy)?.is_empty() {
            return Ok(());
        }
        self.apply(next)?;
        Ok(())
    }

    /// Sets the display compositing translation.
    pub fn set_display_translate(&mut self, tx: f64, ty: f64) -> Result<(), ViewportError> {
        let mut next = self.inputs.clone();
        if next.display.set_translate(tx, ty)?.is_empty() {
            return Ok(());
        }
        self.apply(next)?;
        Ok(())
    }

    /// Switches between aspect-preserving and stretching fits.
    ///
    /// Returns `true` if the mode changed.
    pub fn set_match_aspect_ratio(&mut self, match_aspect_ratio: bool) -> bool {
        if self.inputs.match_aspect_ratio == match_aspect_ratio {
            return false;
        }
        let mut next = self.inputs.clone();
        next.match_aspect_ratio = match_aspect_ratio;
        self.apply(next).is_ok()
    }

    /// Requests that `bounds` be shown.
    ///
    /// Bounds in a non-equivalent CRS are reprojected (leniently) into the
    /// viewport CRS. If the display is empty the request is kept and applied
    /// once the display gets an area; a later request replaces it.
    ///
    /// On error the viewport is left unchanged.
    pub fn request_fit(&mut self, bounds: WorldBounds) -> Result<(), ViewportError> {
        self.request_fit_inner(&bounds, None)
    }

    /// Like [`MapViewport::request_fit`], passing `cancel` to the
    /// reprojection. A cancelled reprojection is reported as
    /// [`ViewportError::Reprojection`] and leaves the viewport unchanged.
    pub fn request_fit_cancellable(
        &mut self,
        bounds: WorldBounds,
        cancel: &CancellationToken,
    ) -> Result<(), ViewportError> {
        self.request_fit_inner(&bounds, Some(cancel))
    }

    fn request_fit_inner(
        &mut self,
        bounds: &WorldBounds,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), ViewportError> {
        let rect = self.rect_in_crs(bounds, cancel).inspect_err(|err| {
            log::warn!("{}: fit request rejected: {err}", self.id);
        })?;
        let mut next = self.inputs.clone();
        next.requested_fit = Some(WorldBounds::new(rect, next.crs.clone()));
        self.apply(next)?;
        Ok(())
    }

    /// Adopts the CRS of `bounds` and shows them without reprojection.
    pub fn show_extent(&mut self, bounds: WorldBounds) -> Result<(), ViewportError> {
        if !bounds.has_finite_extent() {
            return Err(ViewportError::InvalidBounds);
        }
        let mut next = self.inputs.clone();
        next.crs = bounds.crs().clone();
        next.requested_fit = Some(bounds);
        self.apply(next)?;
        Ok(())
    }

    /// Changes the viewport CRS.
    ///
    /// Setting the same instance does nothing. An equivalent CRS replaces
    /// the handle without touching any coordinates. Otherwise the requested
    /// fit is reprojected (leniently) into `crs`; on failure the viewport is
    /// left unchanged.
    pub fn set_crs(&mut self, crs: Crs) -> Result<(), ViewportError> {
        if crs.same_instance(&self.inputs.crs) {
            return Ok(());
        }
        let mut next = self.inputs.clone();
        let equivalent = self.service.are_equivalent(&self.inputs.crs, &crs);
        next.requested_fit = match &self.inputs.requested_fit {
            Some(fit) if !equivalent => {
                let rect = self
                    .service
                    .reproject_bounds(fit.rect(), fit.crs(), &crs, true, None)
                    .inspect_err(|err| {
                        log::warn!("{}: cannot switch to {crs}: {err}", self.id);
                    })?;
                Some(WorldBounds::new(rect, crs.clone()))
            }
            Some(fit) => Some(WorldBounds::new(fit.rect(), crs.clone())),
            None => None,
        };
        next.crs = crs;
        self.apply(next)?;
        Ok(())
    }

    /// Switches to `crs` and requests `fit`, already expressed in `crs`, as
    /// a single change.
    pub(crate) fn set_crs_and_fit(&mut self, crs: Crs, fit: Rect) -> Result<(), ViewportError> {
        let fit = WorldBounds::new(fit, crs.clone());
        if !fit.has_finite_extent() {
            return Err(ViewportError::InvalidBounds);
        }
        let mut next = self.inputs.clone();
        next.crs = crs;
        next.requested_fit = Some(fit);
        self.apply(next)?;
        Ok(())
    }

    /// Returns to the cartesian engineering CRS with nothing to show.
    pub fn reset(&mut self) {
        let mut next = self.inputs.clone();
        next.crs = Crs::cartesian_2d();
        next.requested_fit = None;
        let derived = Derived::idle(&self.derived, true);
        self.commit(next, derived);
    }

    /// Centers the requested fit on `center`, keeping its size.
    ///
    /// Returns `false` if there is no non-empty fit to move or `center` is
    /// not finite.
    pub fn pan_to(&mut self, center: Point) -> bool {
        if !center.is_finite() {
            return false;
        }
        let Some(fit) = self.fit_rect() else {
            return false;
        };
        self.refit(Rect::from_center_size(center, fit.size()))
    }

    /// Moves the map content by `delta` screen pixels, like a drag.
    ///
    /// Returns `false` if the viewport is not ready or `delta` is not
    /// finite.
    pub fn pan_by_screen(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() || self.is_empty() {
            return false;
        }
        let Some(fit) = self.fit_rect() else {
            return false;
        };
        if delta == Vec2::ZERO {
            return true;
        }
        let world_delta = self.derived.screen_to_world.apply_vector(delta);
        self.refit(fit - world_delta)
    }

    /// Centers the view on the world point under `screen_point`.
    ///
    /// Returns `false` if the viewport is not ready or the point is not
    /// finite.
    pub fn center_at_screen(&mut self, screen_point: Point) -> bool {
        if self.is_empty() || !screen_point.is_finite() {
            return false;
        }
        let world = self.to_world_point(screen_point);
        self.pan_to(world)
    }

    /// Zooms about the center of the requested fit. Factors above 1 zoom in.
    ///
    /// Returns `false` if there is no non-empty fit or `factor` is not a
    /// positive finite number.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let Some(fit) = self.fit_rect() else {
            return false;
        };
        self.refit(Rect::from_center_size(fit.center(), fit.size() / factor))
    }

    /// Zooms so that the world point under `anchor` stays under it.
    ///
    /// Returns `false` if the viewport is not ready or the inputs are
    /// invalid.
    pub fn zoom_about_screen_point(&mut self, anchor: Point, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) || !anchor.is_finite() || self.is_empty() {
            return false;
        }
        let Some(fit) = self.fit_rect() else {
            return false;
        };
        let w = self.to_world_point(anchor);
        let scale_about = |v: f64, origin: f64| origin + (v - origin) / factor;
        self.refit(Rect::new(
            scale_about(fit.x0, w.x),
            scale_about(fit.y0, w.y),
            scale_about(fit.x1, w.x),
            scale_about(fit.y1, w.y),
        ))
    }

    /// Transforms the display rectangle by `transform` in screen space and
    /// requests the world area it covers.
    ///
    /// This expresses gestures directly: a translation pans, a scale about a
    /// point zooms out of that point (the display rectangle grows).
    pub fn apply_screen_transform(&mut self, transform: Transform2D) -> bool {
        if self.is_empty() || self.fit_rect().is_none() {
            return false;
        }
        let screen = transform.apply_rect(self.inputs.display.area());
        let world = self.to_world_rect(screen);
        self.refit(world)
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> MapViewportDebugInfo {
        MapViewportDebugInfo {
            id: self.id,
            state: self.derived.state,
            display: self.inputs.display,
            crs: self.inputs.crs.clone(),
            requested_fit: self.inputs.requested_fit.as_ref().map(WorldBounds::rect),
            bounds: self.derived.bounds.as_ref().map(WorldBounds::rect),
            match_aspect_ratio: self.inputs.match_aspect_ratio,
            world_to_screen: self.derived.world_to_screen,
            scale: self.derived.scale,
            listeners: self.listeners.len(),
        }
    }

    /// Builds an event describing the current state.
    pub(crate) fn event(&self, changed: ViewportEvents) -> ViewportEvent {
        ViewportEvent {
            source: self.id,
            changed,
            crs: self.inputs.crs.clone(),
            requested_fit: self.inputs.requested_fit.clone(),
            bounds: if self.is_empty() {
                None
            } else {
                self.derived.bounds.clone()
            },
            display: self.inputs.display,
            scale: self.derived.scale,
            world_to_screen: self.derived.world_to_screen,
        }
    }

    fn fit_rect(&self) -> Option<Rect> {
        self.inputs
            .requested_fit
            .as_ref()
            .filter(|fit| !fit.is_empty())
            .map(WorldBounds::rect)
    }

    fn refit(&mut self, rect: Rect) -> bool {
        if !has_area(rect) {
            return false;
        }
        let mut next = self.inputs.clone();
        next.requested_fit = Some(WorldBounds::new(rect, next.crs.clone()));
        self.apply(next).is_ok()
    }

    /// Derives state for `next` and commits both. On a defect nothing is
    /// committed.
    fn apply(&mut self, next: Inputs) -> Result<(), NonInvertibleTransform> {
        let derived = match self.derive(&next) {
            Ok(derived) => derived,
            Err(defect) => {
                self.config.defect_handling.report(&defect);
                return Err(defect);
            }
        };
        self.commit(next, derived);
        Ok(())
    }

    fn derive(&self, inputs: &Inputs) -> Result<Derived, NonInvertibleTransform> {
        let outcome = match &inputs.requested_fit {
            Some(fit) => fit_bounds(
                inputs.display.area(),
                fit.rect(),
                inputs.match_aspect_ratio,
            )?,
            None => FitOutcome::Deferred,
        };
        Ok(match outcome {
            FitOutcome::Fitted(fit) => {
                let bounds = WorldBounds::new(fit.bounds, inputs.crs.clone());
                let scale = self.compute_scale(&inputs.display, &bounds);
                Derived {
                    state: ViewportState::Ready,
                    bounds: Some(bounds),
                    world_to_screen: fit.world_to_screen,
                    screen_to_world: fit.screen_to_world,
                    scale,
                }
            }
            FitOutcome::Deferred => Derived::idle(&self.derived, false),
        })
    }

    fn compute_scale(&self, display: &Display, bounds: &WorldBounds) -> f64 {
        let (width, height) = display.scaled_pixel_size();
        match self
            .service
            .compute_scale(bounds, width, height, display.dpi())
        {
            Ok(scale) if scale.is_finite() && scale > 0.0 => {
                if self.config.round_scale && scale > 1.0 {
                    scale.round()
                } else {
                    scale
                }
            }
            Ok(scale) => {
                log::warn!("{}: ignoring scale {scale}", self.id);
                -1.0
            }
            Err(err) => {
                log::warn!("{}: cannot compute scale: {err}", self.id);
                -1.0
            }
        }
    }

    fn commit(&mut self, next: Inputs, derived: Derived) {
        let mut changed = ViewportEvents::empty();
        let prev_display = &self.inputs.display;
        if prev_display.size() != next.display.size() {
            changed |= ViewportEvents::DISPLAY_AREA;
        }
        if prev_display.scale() != next.display.scale()
            || prev_display.translate() != next.display.translate()
        {
            changed |= ViewportEvents::DISPLAY_TRANSFORM;
        }
        if prev_display.dpi() != next.display.dpi() {
            changed |= ViewportEvents::DPI;
        }
        if !self.inputs.crs.same_instance(&next.crs) {
            changed |= ViewportEvents::CRS;
        }
        if !same_bounds(self.inputs.requested_fit.as_ref(), next.requested_fit.as_ref()) {
            changed |= ViewportEvents::FIT;
        }
        if !same_bounds(self.derived.bounds.as_ref(), derived.bounds.as_ref()) {
            changed |= ViewportEvents::BOUNDS;
        }
        if self.derived.world_to_screen != derived.world_to_screen {
            changed |= ViewportEvents::TRANSFORM;
        }
        if self.derived.scale != derived.scale {
            changed |= ViewportEvents::SCALE;
        }
        if self.derived.state != derived.state {
            log::debug!(
                "{}: {:?} -> {:?}",
                self.id,
                self.derived.state,
                derived.state
            );
        }

        self.inputs = next;
        self.derived = derived;

        if !changed.is_empty() {
            let event = self.event(changed);
            self.listeners.dispatch(&event);
        }
    }
}

/// Bounds are the same if their rectangles are equal and their CRS handles
/// are the same instance.
fn same_bounds(a: Option<&WorldBounds>, b: Option<&WorldBounds>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.rect() == b.rect() && a.crs().same_instance(b.crs()),
        _ => false,
    }
}

impl fmt::Debug for MapViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapViewport")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("inputs", &self.inputs)
            .field("derived", &self.derived)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

/// Debug snapshot of a [`MapViewport`].
#[derive(Clone, Debug)]
pub struct MapViewportDebugInfo {
    /// Viewport identity.
    pub id: ViewportId,
    /// Lifecycle state.
    pub state: ViewportState,
    /// Display state.
    pub display: Display,
    /// Current CRS.
    pub crs: Crs,
    /// Requested fit rectangle.
    pub requested_fit: Option<Rect>,
    /// Actual bounds rectangle.
    pub bounds: Option<Rect>,
    /// Aspect mode.
    pub match_aspect_ratio: bool,
    /// World to screen transform.
    pub world_to_screen: Transform2D,
    /// Scale denominator.
    pub scale: f64,
    /// Number of listeners.
    pub listeners: usize,
}
