//! Scan observations and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SecurityType;

/// One access point as seen by a single scan cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPointObservation {
    /// Display name. May be empty for hidden networks.
    pub ssid: String,
    /// Hardware identifier — the stable key for identity across
    /// refreshes.
    pub bssid: String,
    pub frequency_ghz: f64,
    /// Raw measured strength, typically negative.
    pub signal_dbm: i32,
    /// Environment-corrected strength. Equals `signal_dbm` when no
    /// environmental sample was available.
    pub affected_signal_dbm: f64,
    /// Estimated physical distance, always ≥ 0.
    pub distance_m: f64,
    /// Best-effort vendor identity; "Mobile"/"Mobile" on lookup failure.
    pub vendor_make: String,
    pub vendor_model: String,
    pub security: SecurityType,
}

/// Current weather conditions consumed by the correction function.
///
/// Fetched on demand, never persisted. Entirely absent (rather than
/// partially filled) when the fetch fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSample {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: Option<f64>,
    pub wind_kph: f64,
}

/// One complete, immutable set of observations captured at a single
/// sampling instant.
///
/// Owned exclusively by the sampling loop until publication, then
/// shared read-only (as `Arc<ScanSnapshot>`) with every consumer.
/// Replaced wholesale each cycle — never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub captured_at: DateTime<Utc>,
    /// Ordered as reported by the adapter.
    pub access_points: Vec<AccessPointObservation>,
}

impl ScanSnapshot {
    pub fn is_empty(&self) -> bool {
        self.access_points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.access_points.len()
    }
}
