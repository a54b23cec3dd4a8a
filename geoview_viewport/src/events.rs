// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications of a [`MapViewport`](crate::MapViewport).
//!
//! Listeners subscribe with a [`ViewportEvents`] mask and are called once per
//! mutation with every matching kind that changed. Events are dispatched only
//! after the viewport has recomputed all of its derived state, and they carry
//! the new values so that listeners do not need to borrow the viewport.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use geoview_crs::{Crs, WorldBounds};
use smallvec::SmallVec;

use crate::display::Display;
use crate::transform::Transform2D;

bitflags::bitflags! {
    /// Kinds of viewport change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ViewportEvents: u16 {
        /// Display width or height.
        const DISPLAY_AREA      = 1 << 0;
        /// Display compositing scale or translation.
        const DISPLAY_TRANSFORM = 1 << 1;
        /// Display resolution.
        const DPI               = 1 << 2;
        /// Actual world bounds.
        const BOUNDS            = 1 << 3;
        /// Requested fit.
        const FIT               = 1 << 4;
        /// Map scale.
        const SCALE             = 1 << 5;
        /// Coordinate reference system.
        const CRS               = 1 << 6;
        /// World/screen transforms.
        const TRANSFORM         = 1 << 7;
    }
}

/// Process-unique identity of a [`MapViewport`](crate::MapViewport).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewportId(u64);

impl ViewportId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewport#{}", self.0)
    }
}

/// Handle returned by [`MapViewport::subscribe`](crate::MapViewport::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A viewport change, with the state after the change.
#[derive(Clone, Debug)]
pub struct ViewportEvent {
    /// Viewport that changed.
    pub source: ViewportId,
    /// Everything that changed in this mutation.
    pub changed: ViewportEvents,
    /// Current CRS.
    pub crs: Crs,
    /// Current requested fit, if any.
    pub requested_fit: Option<WorldBounds>,
    /// Current actual bounds, if the viewport is ready.
    pub bounds: Option<WorldBounds>,
    /// Current display state.
    pub display: Display,
    /// Current scale denominator, `-1.0` when unavailable.
    pub scale: f64,
    /// Current world to screen transform.
    pub world_to_screen: Transform2D,
}

/// Callback invoked for matching viewport events.
pub type ViewportListener = Box<dyn FnMut(&ViewportEvent)>;

struct Entry {
    id: ListenerId,
    mask: ViewportEvents,
    callback: ViewportListener,
}

/// Listener table. Most viewports have a renderer and at most a couple of
/// links listening, so the first few entries live inline.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: SmallVec<[Entry; 4]>,
    next: u64,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, mask: ViewportEvents, callback: ViewportListener) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.push(Entry { id, mask, callback });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Calls every listener whose mask intersects `event.changed`, in
    /// subscription order.
    pub(crate) fn dispatch(&mut self, event: &ViewportEvent) {
        for entry in &mut self.entries {
            if entry.mask.intersects(event.changed) {
                (entry.callback)(event);
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field("next", &self.next)
            .finish()
    }
}
