// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::display::DEFAULT_DPI;

/// What a [`MapViewport`](crate::MapViewport) does when it detects an
/// internal defect, such as a fit that produced a non-invertible transform.
///
/// The viewport keeps its previous consistent state in every case.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefectHandling {
    /// Log at `error` level, then panic in debug builds only.
    #[default]
    DebugAssert,
    /// Log at `error` level only.
    Log,
    /// Log at `error` level, then panic.
    Panic,
}

impl DefectHandling {
    pub(crate) fn report(self, what: &dyn core::fmt::Display) {
        log::error!("viewport defect: {what}");
        match self {
            Self::DebugAssert => {
                if cfg!(debug_assertions) {
                    panic!("viewport defect: {what}");
                }
            }
            Self::Log => {}
            Self::Panic => panic!("viewport defect: {what}"),
        }
    }
}

/// Construction-time settings of a [`MapViewport`](crate::MapViewport).
///
/// ```rust
/// use geoview_viewport::{DefectHandling, ViewportConfig};
///
/// let config = ViewportConfig::default()
///     .with_dpi(96.0)
///     .with_match_aspect_ratio(false)
///     .with_defect_handling(DefectHandling::Log);
/// assert_eq!(config.dpi, 96.0);
/// assert!(config.round_scale);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewportConfig {
    /// Initial display resolution.
    pub dpi: f64,
    /// Preserve the aspect ratio when fitting bounds.
    pub match_aspect_ratio: bool,
    /// Round scale denominators above 1 to the nearest integer.
    pub round_scale: bool,
    /// Policy for internal defects.
    pub defect_handling: DefectHandling,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            match_aspect_ratio: true,
            round_scale: true,
            defect_handling: DefectHandling::default(),
        }
    }
}

impl ViewportConfig {
    /// Sets [`ViewportConfig::dpi`].
    #[must_use]
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Sets [`ViewportConfig::match_aspect_ratio`].
    #[must_use]
    pub fn with_match_aspect_ratio(mut self, match_aspect_ratio: bool) -> Self {
        self.match_aspect_ratio = match_aspect_ratio;
        self
    }

    /// Sets [`ViewportConfig::round_scale`].
    #[must_use]
    pub fn with_round_scale(mut self, round_scale: bool) -> Self {
        self.round_scale = round_scale;
        self
    }

    /// Sets [`ViewportConfig::defect_handling`].
    #[must_use]
    pub fn with_defect_handling(mut self, defect_handling: DefectHandling) -> Self {
        self.defect_handling = defect_handling;
        self
    }
}
