// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional synchronization between two viewports.
//!
//! A [`ViewportLink`] subscribes to both viewports and mirrors the linked
//! properties from whichever one changed onto the other. While a change is
//! being propagated the link remembers which viewport it came from; the echo
//! that the target emits in turn is recognized and dropped instead of being
//! bounced back.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use geoview_crs::{BuiltinCrsService, Crs, CrsService, WorldBounds};
//! use geoview_viewport::{LinkProperties, MapViewport, ViewportLink};
//! use kurbo::Point;
//!
//! let service: Rc<dyn CrsService> = Rc::new(BuiltinCrsService::new());
//! let main = Rc::new(RefCell::new(MapViewport::new(service.clone())));
//! let overview = Rc::new(RefCell::new(MapViewport::new(service)));
//! main.borrow_mut().resize(800.0, 600.0);
//! overview.borrow_mut().resize(200.0, 150.0);
//!
//! let link = ViewportLink::link(&main, &overview, LinkProperties::PAN).unwrap();
//! main.borrow_mut()
//!     .show_extent(WorldBounds::from_coords(0.0, 0.0, 100.0, 100.0, Crs::cartesian_2d()))
//!     .unwrap();
//! main.borrow_mut().pan_to(Point::new(80.0, 20.0));
//!
//! let center = overview.borrow().requested_fit().unwrap().center();
//! assert_eq!(center, Point::new(80.0, 20.0));
//! assert_eq!(link.stats().suppressed, link.stats().propagated);
//! ```

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use geoview_crs::{Crs, WorldBounds};
use kurbo::Rect;

use crate::error::ViewportError;
use crate::events::{ListenerId, ViewportEvent, ViewportEvents, ViewportId};
use crate::viewport::MapViewport;

bitflags::bitflags! {
    /// Properties synchronized by a [`ViewportLink`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LinkProperties: u8 {
        /// Center of the requested fit.
        const PAN     = 0b0001;
        /// Size of the requested fit.
        const ZOOM    = 0b0010;
        /// Coordinate reference system.
        const CRS     = 0b0100;
        /// Display compositing scale and translation.
        const DISPLAY = 0b1000;
    }
}

impl LinkProperties {
    /// Viewport events that carry changes of these properties.
    #[must_use]
    pub fn events(self) -> ViewportEvents {
        let mut events = ViewportEvents::empty();
        if self.intersects(Self::PAN | Self::ZOOM) {
            events |= ViewportEvents::FIT;
        }
        if self.contains(Self::CRS) {
            events |= ViewportEvents::CRS;
        }
        if self.contains(Self::DISPLAY) {
            events |= ViewportEvents::DISPLAY_TRANSFORM;
        }
        events
    }
}

/// Propagation counters of a [`ViewportLink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Changes mirrored onto the other viewport.
    pub propagated: u64,
    /// Echoes dropped because a propagation was already in progress.
    pub suppressed: u64,
}

#[derive(Debug, Default)]
struct Guard {
    origin: Cell<Option<ViewportId>>,
    detached: Cell<bool>,
    propagated: Cell<u64>,
    suppressed: Cell<u64>,
}

/// Symmetric synchronization of two [`MapViewport`]s.
///
/// The link holds weak references only: dropping a viewport ends
/// propagation towards it, and dropping the link (or calling
/// [`ViewportLink::unlink`]) removes its listeners from both viewports,
/// leaving them with their last synchronized state.
#[derive(Debug)]
pub struct ViewportLink {
    a: Weak<RefCell<MapViewport>>,
    b: Weak<RefCell<MapViewport>>,
    a_listener: Option<ListenerId>,
    b_listener: Option<ListenerId>,
    properties: LinkProperties,
    guard: Rc<Guard>,
}

impl ViewportLink {
    /// Links `a` and `b`, first bringing `b` in line with `a`.
    ///
    /// Neither viewport may be borrowed while this runs. Fails if `a` and
    /// `b` are the same viewport or if `b` cannot adopt `a`'s state, in
    /// which case no listener is installed.
    pub fn link(
        a: &Rc<RefCell<MapViewport>>,
        b: &Rc<RefCell<MapViewport>>,
        properties: LinkProperties,
    ) -> Result<Self, ViewportError> {
        if Rc::ptr_eq(a, b) {
            return Err(ViewportError::SelfLink);
        }
        let initial = {
            let a = a.borrow();
            a.event(ViewportEvents::all())
        };
        mirror(&mut b.borrow_mut(), properties, &initial)?;

        let guard = Rc::new(Guard::default());
        let mask = properties.events();
        let a_listener = a
            .borrow_mut()
            .subscribe(mask, listener(Rc::downgrade(b), properties, guard.clone()));
        let b_listener = b
            .borrow_mut()
            .subscribe(mask, listener(Rc::downgrade(a), properties, guard.clone()));
        log::debug!(
            "linked {} and {} for {properties:?}",
            a.borrow().id(),
            b.borrow().id()
        );

        Ok(Self {
            a: Rc::downgrade(a),
            b: Rc::downgrade(b),
            a_listener: Some(a_listener),
            b_listener: Some(b_listener),
            properties,
            guard,
        })
    }

    /// Linked properties.
    #[must_use]
    pub fn properties(&self) -> LinkProperties {
        self.properties
    }

    /// Propagation counters.
    #[must_use]
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            propagated: self.guard.propagated.get(),
            suppressed: self.guard.suppressed.get(),
        }
    }

    /// Returns `true` until the link is unlinked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.guard.detached.get()
    }

    /// Removes the link's listeners from both viewports.
    pub fn unlink(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        self.guard.detached.set(true);
        let pairs = [
            (&self.a, &mut self.a_listener),
            (&self.b, &mut self.b_listener),
        ];
        for (viewport, listener) in pairs {
            let (Some(viewport), Some(id)) = (viewport.upgrade(), listener.take()) else {
                continue;
            };
            match viewport.try_borrow_mut() {
                Ok(mut viewport) => {
                    viewport.unsubscribe(id);
                }
                // The listener stays installed but is inert.
                Err(_) => {
                    log::warn!("viewport busy while unlinking, listener {id:?} left inert");
                }
            }
        }
    }
}

impl Drop for ViewportLink {
    fn drop(&mut self) {
        self.detach();
    }
}

fn listener(
    target: Weak<RefCell<MapViewport>>,
    properties: LinkProperties,
    guard: Rc<Guard>,
) -> impl FnMut(&ViewportEvent) + 'static {
    move |event| {
        if guard.detached.get() {
            return;
        }
        if let Some(origin) = guard.origin.get() {
            log::trace!(
                "link guard: dropping echo from {} while propagating from {origin}",
                event.source
            );
            guard.suppressed.set(guard.suppressed.get() + 1);
            return;
        }
        let Some(target) = target.upgrade() else {
            return;
        };
        let Ok(mut target) = target.try_borrow_mut() else {
            // The target is mid-mutation further up the stack: a longer
            // cycle through other links.
            log::trace!("link guard: target of {} is busy", event.source);
            guard.suppressed.set(guard.suppressed.get() + 1);
            return;
        };

        guard.origin.set(Some(event.source));
        if let Err(err) = mirror(&mut target, properties, event) {
            log::warn!(
                "cannot mirror {} onto {}: {err}",
                event.source,
                target.id()
            );
        }
        guard.origin.set(None);
        guard.propagated.set(guard.propagated.get() + 1);
    }
}

/// Applies the linked properties of `event` to `target`.
///
/// The CRS and the fit are derived first and applied as one change, so a
/// failed reprojection leaves both untouched. Display factors come from a
/// valid source display and are applied before them.
fn mirror(
    target: &mut MapViewport,
    properties: LinkProperties,
    event: &ViewportEvent,
) -> Result<(), ViewportError> {
    if properties.contains(LinkProperties::DISPLAY)
        && event.changed.contains(ViewportEvents::DISPLAY_TRANSFORM)
    {
        let (sx, sy) = event.display.scale();
        let (tx, ty) = event.display.translate();
        target.set_display_scale(sx, sy)?;
        target.set_display_translate(tx, ty)?;
    }

    let crs = (properties.contains(LinkProperties::CRS)
        && event.changed.contains(ViewportEvents::CRS))
    .then(|| event.crs.clone());
    let pan_zoom = properties & (LinkProperties::PAN | LinkProperties::ZOOM);
    let source_fit = event
        .requested_fit
        .as_ref()
        .filter(|_| !pan_zoom.is_empty() && event.changed.contains(ViewportEvents::FIT));

    match (crs, source_fit) {
        (Some(crs), None) => target.set_crs(crs),
        (crs, Some(source_fit)) => {
            let crs = crs.unwrap_or_else(|| target.crs().clone());
            let fit = linked_fit(target, &crs, pan_zoom, source_fit)?;
            target.set_crs_and_fit(crs, fit)
        }
        (None, None) => Ok(()),
    }
}

/// The fit `target` should take for a source fit, expressed in `crs`.
fn linked_fit(
    target: &MapViewport,
    crs: &Crs,
    pan_zoom: LinkProperties,
    source_fit: &WorldBounds,
) -> Result<Rect, ViewportError> {
    let source = target.rect_in(source_fit, crs, None)?;
    if pan_zoom.contains(LinkProperties::PAN | LinkProperties::ZOOM) {
        return Ok(source);
    }
    let Some(current) = target.requested_fit().filter(|fit| !fit.is_empty()) else {
        return Ok(source);
    };
    let current = target.rect_in(current, crs, None)?;
    Ok(if pan_zoom.contains(LinkProperties::PAN) {
        Rect::from_center_size(source.center(), current.size())
    } else {
        Rect::from_center_size(current.center(), source.size())
    })
}
