// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background loading of CRS catalogs.
//!
//! A [`CatalogLoader`] asks a [`CrsAuthority`] for a set of codes, builds a
//! [`CrsInfo`] for each one on a worker thread and streams progress back over
//! a channel. The final list is only delivered when every code has been
//! processed; a cancelled load ends with [`CatalogEvent::Cancelled`] and no
//! partial result.
//!
//! ```rust
//! use std::sync::Arc;
//! use geoview_crs::{BuiltinAuthority, CancellationToken, CatalogLoader, CatalogOutcome, CatalogRequest};
//!
//! let load = CatalogLoader::spawn(
//!     Arc::new(BuiltinAuthority),
//!     CatalogRequest::all(),
//!     CancellationToken::new(),
//! );
//! match load.wait() {
//!     CatalogOutcome::Completed(infos) => assert!(!infos.is_empty()),
//!     CatalogOutcome::Cancelled => unreachable!(),
//! }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

use crate::cancel::CancellationToken;
use crate::crs::{AxisOrder, CoordinateSystem, Crs, CrsDefinition, LinearUnit};
use crate::error::CrsLookupError;
use crate::registry::{CrsInfo, CrsRegistry};

/// Source of coordinate reference systems by authority code.
pub trait CrsAuthority: Send + Sync {
    /// Every code this authority can be asked about.
    fn codes(&self) -> Vec<String>;

    /// Builds the system for `code`.
    ///
    /// With `force_longitude_first`, geographic systems are built with
    /// longitude as the first axis whatever the authority order is.
    fn create(&self, code: &str, force_longitude_first: bool) -> Result<Crs, CrsLookupError>;

    /// Free-text description of `code`, available even for codes that
    /// [`CrsAuthority::create`] cannot build.
    fn description(&self, code: &str) -> Option<String>;
}

enum Entry {
    System(CoordinateSystem),
    Unsupported(&'static str),
}

const BUILTIN: &[(&str, &str, Entry)] = &[
    (
        "CRS:84",
        "WGS 84 (CRS84)",
        Entry::System(CoordinateSystem::Geographic {
            axis_order: AxisOrder::EastNorth,
        }),
    ),
    (
        "EPSG:3857",
        "WGS 84 / Pseudo-Mercator",
        Entry::System(CoordinateSystem::WebMercator),
    ),
    (
        "EPSG:4326",
        "WGS 84",
        Entry::System(CoordinateSystem::Geographic {
            axis_order: AxisOrder::NorthEast,
        }),
    ),
    (
        "EPSG:4978",
        "WGS 84 (geocentric)",
        Entry::System(CoordinateSystem::Geocentric),
    ),
    ("EPSG:5773", "EGM96 height", Entry::System(CoordinateSystem::Vertical)),
    (
        "EPSG:54009",
        "World_Mollweide",
        Entry::Unsupported("Mollweide projection is not implemented"),
    ),
    (
        "EPSG:900913",
        "Google Maps Global Mercator",
        Entry::System(CoordinateSystem::WebMercator),
    ),
    (
        "LOCAL:1",
        "Cartesian 2D",
        Entry::System(CoordinateSystem::Cartesian {
            unit: LinearUnit::Metre,
        }),
    ),
];

/// The small set of systems the builtin
/// [`BuiltinCrsService`](crate::BuiltinCrsService) knows about.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAuthority;

impl BuiltinAuthority {
    fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, Entry)> {
        BUILTIN
            .iter()
            .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
    }
}

impl CrsAuthority for BuiltinAuthority {
    fn codes(&self) -> Vec<String> {
        BUILTIN.iter().map(|(code, _, _)| (*code).to_owned()).collect()
    }

    fn create(&self, code: &str, force_longitude_first: bool) -> Result<Crs, CrsLookupError> {
        let (canonical, name, entry) =
            Self::lookup(code).ok_or_else(|| CrsLookupError::NoSuchCode(code.to_owned()))?;
        match entry {
            Entry::Unsupported(reason) => Err(CrsLookupError::Unsupported {
                code: (*canonical).to_owned(),
                reason: (*reason).to_owned(),
            }),
            Entry::System(system) => {
                let system = match *system {
                    CoordinateSystem::Geographic { .. } if force_longitude_first => {
                        CoordinateSystem::Geographic {
                            axis_order: AxisOrder::EastNorth,
                        }
                    }
                    other => other,
                };
                Ok(Crs::new(CrsDefinition {
                    code: Some((*canonical).to_owned()),
                    name: (*name).to_owned(),
                    system,
                }))
            }
        }
    }

    fn description(&self, code: &str) -> Option<String> {
        Self::lookup(code).map(|(_, name, _)| (*name).to_owned())
    }
}

/// What to load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogRequest {
    /// Codes to load. Empty means every code of the authority.
    pub codes: BTreeSet<String>,
    /// Build geographic systems with longitude as the first axis.
    pub force_longitude_first: bool,
}

impl CatalogRequest {
    /// Request for every code of the authority.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Request for a specific set of codes.
    #[must_use]
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            force_longitude_first: false,
        }
    }

    /// Sets [`CatalogRequest::force_longitude_first`].
    #[must_use]
    pub fn with_force_longitude_first(mut self, force: bool) -> Self {
        self.force_longitude_first = force;
        self
    }
}

/// Progress and results streamed by a catalog load.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    /// The set of codes is known.
    Started {
        /// Number of codes that will be processed.
        total: u64,
    },
    /// One more code has been processed.
    Progress {
        /// Codes processed so far.
        done: u64,
        /// Codes to process in total.
        total: u64,
    },
    /// Every code was processed; entries are ordered by code.
    Completed(Vec<CrsInfo>),
    /// The load was cancelled; no result follows.
    Cancelled,
}

/// Final outcome of a catalog load.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogOutcome {
    /// Every requested code was processed.
    Completed(Vec<CrsInfo>),
    /// The load was cancelled before it finished.
    Cancelled,
}

/// Handle to a catalog load running on a worker thread.
#[derive(Debug)]
pub struct CatalogLoad {
    events: Receiver<CatalogEvent>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CatalogLoad {
    /// Stream of events. The stream ends after [`CatalogEvent::Completed`]
    /// or [`CatalogEvent::Cancelled`].
    #[must_use]
    pub fn events(&self) -> &Receiver<CatalogEvent> {
        &self.events
    }

    /// Requests cancellation of the load.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Blocks until the load finishes, discarding progress events.
    #[must_use]
    pub fn wait(mut self) -> CatalogOutcome {
        let mut outcome = None;
        for event in self.events.iter() {
            match event {
                CatalogEvent::Completed(infos) => outcome = Some(CatalogOutcome::Completed(infos)),
                CatalogEvent::Cancelled => outcome = Some(CatalogOutcome::Cancelled),
                CatalogEvent::Started { .. } | CatalogEvent::Progress { .. } => {}
            }
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("catalog worker panicked");
            }
        }
        outcome.unwrap_or(CatalogOutcome::Cancelled)
    }
}

/// Loads CRS catalogs from a [`CrsAuthority`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    /// Starts loading `request` on a worker thread.
    #[must_use]
    pub fn spawn(
        authority: Arc<dyn CrsAuthority>,
        request: CatalogRequest,
        cancel: CancellationToken,
    ) -> CatalogLoad {
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            let outcome = Self::load(authority.as_ref(), &request, &worker_cancel, |event| {
                // The receiver may have been dropped; keep going so that
                // cancellation is still observed.
                let _ = tx.send(event);
            });
            let last = match outcome {
                CatalogOutcome::Completed(infos) => CatalogEvent::Completed(infos),
                CatalogOutcome::Cancelled => CatalogEvent::Cancelled,
            };
            let _ = tx.send(last);
        });
        CatalogLoad {
            events: rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Loads `request` on the calling thread, reporting
    /// [`CatalogEvent::Started`] and [`CatalogEvent::Progress`] to `progress`.
    pub fn load(
        authority: &dyn CrsAuthority,
        request: &CatalogRequest,
        cancel: &CancellationToken,
        mut progress: impl FnMut(CatalogEvent),
    ) -> CatalogOutcome {
        let codes: BTreeSet<String> = if request.codes.is_empty() {
            authority.codes().into_iter().collect()
        } else {
            request.codes.clone()
        };
        if cancel.is_cancelled() {
            return CatalogOutcome::Cancelled;
        }

        let total = codes.len() as u64;
        log::debug!(
            "loading {total} coordinate reference systems{}",
            if request.force_longitude_first {
                " (longitude first)"
            } else {
                ""
            }
        );
        progress(CatalogEvent::Started { total });

        let mut infos = Vec::with_capacity(codes.len());
        for (done, code) in (1_u64..).zip(codes) {
            if cancel.is_cancelled() {
                log::debug!("catalog load cancelled after {} of {total}", done - 1);
                return CatalogOutcome::Cancelled;
            }
            let info = match authority.create(&code, request.force_longitude_first) {
                Ok(crs) => CrsInfo::loaded(code, crs),
                Err(err) => {
                    log::debug!("{code}: {err}");
                    let description = authority.description(&code);
                    CrsInfo::unsupported(code, description, err.to_string())
                }
            };
            infos.push(info);
            progress(CatalogEvent::Progress { done, total });
        }

        if cancel.is_cancelled() {
            CatalogOutcome::Cancelled
        } else {
            CatalogOutcome::Completed(infos)
        }
    }

    /// Loads `request` on the calling thread straight into a registry.
    ///
    /// Returns `None` if the load was cancelled.
    #[must_use]
    pub fn load_registry(
        authority: &dyn CrsAuthority,
        request: &CatalogRequest,
        cancel: &CancellationToken,
    ) -> Option<CrsRegistry> {
        match Self::load(authority, request, cancel, |_| {}) {
            CatalogOutcome::Completed(infos) => Some(infos.into_iter().collect()),
            CatalogOutcome::Cancelled => None,
        }
    }
}
