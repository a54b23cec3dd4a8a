// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;

use crate::crs::{Crs, CrsKind};

/// Catalog entry for one authority code.
///
/// Entries are produced by the [`CatalogLoader`](crate::CatalogLoader). A
/// code that failed to load is still listed, with its failure reason in
/// [`CrsInfo::load_error`], so that users can see why it is unavailable.
#[derive(Clone, Debug, PartialEq)]
pub struct CrsInfo {
    code: String,
    display_name: Option<String>,
    kind: CrsKind,
    crs: Option<Crs>,
    load_error: Option<String>,
}

impl CrsInfo {
    /// Entry for a successfully loaded system.
    #[must_use]
    pub fn loaded(code: impl Into<String>, crs: Crs) -> Self {
        Self {
            code: code.into(),
            display_name: Some(crs.name().to_owned()),
            kind: crs.kind(),
            crs: Some(crs),
            load_error: None,
        }
    }

    /// Entry for a code that could not be loaded.
    #[must_use]
    pub fn unsupported(
        code: impl Into<String>,
        description: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            display_name: description,
            kind: CrsKind::Unknown,
            crs: None,
            load_error: Some(reason.into()),
        }
    }

    /// Authority code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Name to show in pickers, if known.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Classification of the system.
    #[must_use]
    pub fn kind(&self) -> CrsKind {
        self.kind
    }

    /// The loaded system, if loading succeeded.
    #[must_use]
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Why loading failed, if it did.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Returns `true` if the system loaded and can back a map display.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.load_error.is_none() && self.kind.is_supported()
    }
}

/// Catalog of [`CrsInfo`] entries keyed by authority code.
#[derive(Clone, Debug, Default)]
pub struct CrsRegistry {
    entries: BTreeMap<String, CrsInfo>,
}

impl CrsRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any entry with the same code.
    ///
    /// Returns `true` if the code was not present before.
    pub fn add(&mut self, info: CrsInfo) -> bool {
        self.entries.insert(info.code.clone(), info).is_none()
    }

    /// Adds every entry of `infos`.
    pub fn add_all(&mut self, infos: impl IntoIterator<Item = CrsInfo>) {
        for info in infos {
            self.add(info);
        }
    }

    /// Removes and returns the entry for `code`.
    pub fn remove(&mut self, code: &str) -> Option<CrsInfo> {
        self.entries.remove(code)
    }

    /// Returns `true` if an entry for `code` exists.
    #[must_use]
    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Returns the entry for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CrsInfo> {
        self.entries.get(code)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &CrsInfo> {
        self.entries.values()
    }

    /// Entries usable as a map display system.
    pub fn supported(&self) -> impl Iterator<Item = &CrsInfo> {
        self.iter().filter(|info| info.is_supported())
    }

    /// Entries that failed to load or are of an unsupported kind.
    pub fn unsupported(&self) -> impl Iterator<Item = &CrsInfo> {
        self.iter().filter(|info| !info.is_supported())
    }
}

impl FromIterator<CrsInfo> for CrsRegistry {
    fn from_iter<T: IntoIterator<Item = CrsInfo>>(iter: T) -> Self {
        let mut registry = Self::new();
        registry.add_all(iter);
        registry
    }
}
