// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marshaling viewport updates from other threads.
//!
//! A [`MapViewport`] is confined to the thread that owns it. Worker threads
//! (tile loaders, CRS catalog loads, network handlers) instead send
//! [`ViewportCommand`]s through an [`UpdateSender`]; the owning thread drains
//! them in order with [`UpdateQueue::drain`].
//!
//! ```rust
//! use std::rc::Rc;
//! use geoview_crs::BuiltinCrsService;
//! use geoview_viewport::{MapViewport, ViewportCommand, update_queue};
//!
//! let (tx, queue) = update_queue(16);
//! std::thread::spawn(move || {
//!     tx.send(ViewportCommand::Resize { width: 640.0, height: 480.0 }).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut vp = MapViewport::new(Rc::new(BuiltinCrsService::new()));
//! let report = queue.drain(&mut vp);
//! assert_eq!(report.applied, 1);
//! assert_eq!(vp.display().width(), 640.0);
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError};
use geoview_crs::{Crs, WorldBounds};
use kurbo::{Point, Vec2};
use thiserror::Error;

use crate::error::ViewportError;
use crate::transform::Transform2D;
use crate::viewport::MapViewport;

/// A viewport mutation that can be sent across threads.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportCommand {
    /// [`MapViewport::resize`].
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// [`MapViewport::set_dpi`].
    SetDpi(f64),
    /// [`MapViewport::set_display_scale`].
    SetDisplayScale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
    /// [`MapViewport::set_display_translate`].
    SetDisplayTranslate {
        /// Horizontal offset.
        tx: f64,
        /// Vertical offset.
        ty: f64,
    },
    /// [`MapViewport::set_match_aspect_ratio`].
    SetMatchAspectRatio(bool),
    /// [`MapViewport::request_fit`].
    RequestFit(WorldBounds),
    /// [`MapViewport::show_extent`].
    ShowExtent(WorldBounds),
    /// [`MapViewport::set_crs`].
    SetCrs(Crs),
    /// [`MapViewport::reset`].
    Reset,
    /// [`MapViewport::pan_to`].
    PanTo(Point),
    /// [`MapViewport::pan_by_screen`].
    PanByScreen(Vec2),
    /// [`MapViewport::center_at_screen`].
    CenterAtScreen(Point),
    /// [`MapViewport::zoom_by`].
    ZoomBy(f64),
    /// [`MapViewport::zoom_about_screen_point`].
    ZoomAboutScreenPoint {
        /// Screen point that stays fixed.
        anchor: Point,
        /// Zoom factor, above 1 to zoom in.
        factor: f64,
    },
    /// [`MapViewport::apply_screen_transform`].
    ApplyScreenTransform(Transform2D),
}

impl ViewportCommand {
    /// Applies the command.
    ///
    /// Returns `Ok(false)` for commands that changed nothing, such as a pan
    /// on a viewport with nothing to show or a resize to the current size.
    pub fn apply(self, viewport: &mut MapViewport) -> Result<bool, ViewportError> {
        Ok(match self {
            Self::Resize { width, height } => viewport.resize(width, height),
            Self::SetDpi(dpi) => {
                viewport.set_dpi(dpi)?;
                true
            }
            Self::SetDisplayScale { sx, sy } => {
                viewport.set_display_scale(sx, sy)?;
                true
            }
            Self::SetDisplayTranslate { tx, ty } => {
                viewport.set_display_translate(tx, ty)?;
                true
            }
            Self::SetMatchAspectRatio(enabled) => viewport.set_match_aspect_ratio(enabled),
            Self::RequestFit(bounds) => {
                viewport.request_fit(bounds)?;
                true
            }
            Self::ShowExtent(bounds) => {
                viewport.show_extent(bounds)?;
                true
            }
            Self::SetCrs(crs) => {
                viewport.set_crs(crs)?;
                true
            }
            Self::Reset => {
                viewport.reset();
                true
            }
            Self::PanTo(center) => viewport.pan_to(center),
            Self::PanByScreen(delta) => viewport.pan_by_screen(delta),
            Self::CenterAtScreen(point) => viewport.center_at_screen(point),
            Self::ZoomBy(factor) => viewport.zoom_by(factor),
            Self::ZoomAboutScreenPoint { anchor, factor } => {
                viewport.zoom_about_screen_point(anchor, factor)
            }
            Self::ApplyScreenTransform(transform) => viewport.apply_screen_transform(transform),
        })
    }
}

/// A command could not be queued. The command is handed back.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SendError {
    /// The queue is at capacity.
    #[error("viewport update queue is full")]
    Full(ViewportCommand),
    /// The [`UpdateQueue`] was dropped.
    #[error("viewport update queue is closed")]
    Disconnected(ViewportCommand),
}

impl SendError {
    /// The command that was not sent.
    #[must_use]
    pub fn into_command(self) -> ViewportCommand {
        match self {
            Self::Full(command) | Self::Disconnected(command) => command,
        }
    }
}

/// Sending half of the update queue. Cheap to clone and `Send`.
#[derive(Clone, Debug)]
pub struct UpdateSender {
    tx: Sender<ViewportCommand>,
}

impl UpdateSender {
    /// Queues `command`, blocking while the queue is full.
    pub fn send(&self, command: ViewportCommand) -> Result<(), SendError> {
        self.tx
            .send(command)
            .map_err(|err| SendError::Disconnected(err.into_inner()))
    }

    /// Queues `command` if there is room.
    pub fn try_send(&self, command: ViewportCommand) -> Result<(), SendError> {
        self.tx.try_send(command).map_err(|err| match err {
            TrySendError::Full(command) => SendError::Full(command),
            TrySendError::Disconnected(command) => SendError::Disconnected(command),
        })
    }
}

/// Outcome of [`UpdateQueue::drain`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrainReport {
    /// Commands that took effect.
    pub applied: usize,
    /// Commands that were valid but had nothing to act on.
    pub ignored: usize,
    /// Commands that failed, by position in the drained batch.
    pub errors: Vec<(usize, ViewportError)>,
}

impl DrainReport {
    /// Total number of commands drained.
    #[must_use]
    pub fn total(&self) -> usize {
        self.applied + self.ignored + self.errors.len()
    }
}

/// Receiving half of the update queue, owned by the viewport's thread.
#[derive(Debug)]
pub struct UpdateQueue {
    rx: Receiver<ViewportCommand>,
}

impl UpdateQueue {
    /// Applies the commands queued so far to `viewport`, in order, without
    /// blocking. Commands sent while draining wait for the next drain.
    ///
    /// A failing command does not stop the drain; its error is recorded in
    /// the report and the viewport keeps its previous state for it.
    pub fn drain(&self, viewport: &mut MapViewport) -> DrainReport {
        let mut report = DrainReport::default();
        let pending = self.rx.len();
        for (index, command) in self.rx.try_iter().take(pending).enumerate() {
            match command.apply(viewport) {
                Ok(true) => report.applied += 1,
                Ok(false) => report.ignored += 1,
                Err(err) => {
                    log::warn!("{}: queued update {index} failed: {err}", viewport.id());
                    report.errors.push((index, err));
                }
            }
        }
        if report.total() > 0 {
            log::debug!(
                "{}: drained {} updates ({} ignored, {} failed)",
                viewport.id(),
                report.total(),
                report.ignored,
                report.errors.len()
            );
        }
        report
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` if no command is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Creates an update queue holding up to `capacity` commands (at least one).
#[must_use]
pub fn update_queue(capacity: usize) -> (UpdateSender, UpdateQueue) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (UpdateSender { tx }, UpdateQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::{SendError, ViewportCommand, update_queue};

    #[test]
    fn full_and_closed_queues_hand_commands_back() {
        let (tx, queue) = update_queue(1);
        tx.try_send(ViewportCommand::ZoomBy(2.0)).unwrap();
        let err = tx.try_send(ViewportCommand::Reset).unwrap_err();
        assert_eq!(err, SendError::Full(ViewportCommand::Reset));
        assert_eq!(queue.len(), 1);

        drop(queue);
        let err = tx.send(ViewportCommand::SetDpi(72.0)).unwrap_err();
        assert_eq!(err.into_command(), ViewportCommand::SetDpi(72.0));
    }

    #[test]
    fn sender_is_send() {
        fn assert_send<T: Send + Clone>() {}
        assert_send::<super::UpdateSender>();
    }
}
