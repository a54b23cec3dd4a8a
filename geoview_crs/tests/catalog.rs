// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for CRS catalog loading.
//!
//! These cover the streamed progress protocol, cancellation (which must never
//! deliver a partial result) and classification into the registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use geoview_crs::{
    BuiltinAuthority, CancellationToken, CatalogEvent, CatalogLoader, CatalogOutcome,
    CatalogRequest, Crs, CrsAuthority, CrsKind, CrsLookupError,
};

#[test]
fn spawned_load_streams_progress_then_result() {
    let load = CatalogLoader::spawn(
        Arc::new(BuiltinAuthority),
        CatalogRequest::all(),
        CancellationToken::new(),
    );
    let events: Vec<CatalogEvent> = load.events().iter().collect();

    let total = BuiltinAuthority.codes().len() as u64;
    assert_eq!(events.first(), Some(&CatalogEvent::Started { total }));
    let progress: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            CatalogEvent::Progress { done, .. } => Some(*done),
            _ => None,
        })
        .collect();
    assert_eq!(progress, (1..=total).collect::<Vec<_>>());

    let Some(CatalogEvent::Completed(infos)) = events.last() else {
        panic!("load should complete, got {events:?}");
    };
    assert_eq!(infos.len() as u64, total);
    let codes: Vec<&str> = infos.iter().map(|i| i.code()).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted, "entries are ordered by code");
}

#[test]
fn provided_codes_restrict_the_load_and_unknown_codes_are_listed() {
    let request = CatalogRequest::codes(["EPSG:3857", "EPSG:999999"]);
    let outcome = CatalogLoader::load(
        &BuiltinAuthority,
        &request,
        &CancellationToken::new(),
        |_| {},
    );
    let CatalogOutcome::Completed(infos) = outcome else {
        panic!("not cancelled");
    };
    assert_eq!(infos.len(), 2);
    assert!(infos[0].is_supported());
    assert_eq!(infos[0].kind(), CrsKind::Projected);
    assert_eq!(infos[1].code(), "EPSG:999999");
    assert!(!infos[1].is_supported());
    assert!(infos[1].load_error().is_some());
}

#[test]
fn cancelled_before_start_delivers_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let load = CatalogLoader::spawn(Arc::new(BuiltinAuthority), CatalogRequest::all(), token);
    let events: Vec<CatalogEvent> = load.events().iter().collect();
    assert_eq!(events, [CatalogEvent::Cancelled]);
}

/// Authority that cancels the shared token while building its second code.
struct CancellingAuthority {
    token: CancellationToken,
    calls: AtomicUsize,
}

impl CrsAuthority for CancellingAuthority {
    fn codes(&self) -> Vec<String> {
        (0..10).map(|i| format!("TEST:{i}")).collect()
    }

    fn create(&self, _code: &str, _force_longitude_first: bool) -> Result<Crs, CrsLookupError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            self.token.cancel();
        }
        Ok(Crs::cartesian_2d())
    }

    fn description(&self, _code: &str) -> Option<String> {
        None
    }
}

#[test]
fn cancelling_midway_yields_no_partial_result() {
    let token = CancellationToken::new();
    let authority = Arc::new(CancellingAuthority {
        token: token.clone(),
        calls: AtomicUsize::new(0),
    });
    let load = CatalogLoader::spawn(authority.clone(), CatalogRequest::all(), token);
    assert_eq!(load.wait(), CatalogOutcome::Cancelled);
    assert_eq!(authority.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn registry_load_classifies_entries() {
    let registry = CatalogLoader::load_registry(
        &BuiltinAuthority,
        &CatalogRequest::all().with_force_longitude_first(true),
        &CancellationToken::new(),
    )
    .expect("not cancelled");

    let supported: Vec<&str> = registry.supported().map(|i| i.code()).collect();
    assert_eq!(supported, ["CRS:84", "EPSG:3857", "EPSG:4326", "EPSG:900913"]);
    assert!(registry.unsupported().any(|i| i.code() == "EPSG:4978"));
    assert!(registry.unsupported().any(|i| i.code() == "EPSG:54009"));

    let wgs84 = registry.get("EPSG:4326").and_then(|i| i.crs()).unwrap();
    assert!(wgs84.equivalent_ignoring_metadata(&Crs::wgs84_lon_lat()));
}
