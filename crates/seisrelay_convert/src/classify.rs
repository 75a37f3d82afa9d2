//! Bulletin name classification.
//!
//! JMA encodes the bulletin kind in the file name. Three precompiled
//! patterns are tried in a fixed priority order, first match wins; a name
//! matching none of them is a valid result, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// VXSE51 seismic intensity report
// VXSE52 hypocenter report
// VXSE53 hypocenter and intensity report
static QUAKE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("VXSE5[123]").expect("quake pattern must compile"));

// VTSE41 tsunami warning / advisory / forecast
static TSUNAMI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("VTSE41").expect("tsunami pattern must compile"));

// VXSE43 earthquake early warning (warning)
// VXSE44 earthquake early warning (warning / forecast)
static EEW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("VXSE4[34]").expect("eew pattern must compile"));

/// Content category of a bulletin, derived purely from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Quake,
    Tsunami,
    EarlyWarning,
    Unrecognized,
}

impl Classification {
    /// Sink topic fragment for this category, `None` for unrecognized names.
    ///
    /// The publisher appends this to the `jma.` prefix when building the
    /// target URL.
    pub fn topic(&self) -> Option<&'static str> {
        match self {
            Classification::Quake => Some("earthquake"),
            Classification::Tsunami => Some("tsunami"),
            Classification::EarlyWarning => Some("eew"),
            Classification::Unrecognized => None,
        }
    }
}

/// Classify a bulletin file name into its content category.
///
/// First match wins: earthquake reports, then the tsunami bulletin, then
/// early warnings. Pure function, no error path.
pub fn classify(filename: &str) -> Classification {
    if QUAKE_PATTERN.is_match(filename) {
        return Classification::Quake;
    }
    if TSUNAMI_PATTERN.is_match(filename) {
        return Classification::Tsunami;
    }
    if EEW_PATTERN.is_match(filename) {
        return Classification::EarlyWarning;
    }
    Classification::Unrecognized
}
