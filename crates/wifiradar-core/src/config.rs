//! Monitor configuration.
//!
//! Core never reads files or environment variables — the presentation
//! crate assembles a [`MonitorConfig`] and hands it over pre-built.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Configuration for [`Monitor`](crate::Monitor) and its pipeline.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Weather API base URL (joined with `current.json`).
    pub weather_url: Url,
    /// Weather API key.
    pub weather_api_key: SecretString,
    /// Location token passed to the weather source. The default
    /// `auto:ip` sentinel asks the provider to geolocate by source IP.
    pub location: String,
    /// Geolocation-by-BSSID endpoint. Optional — position columns stay
    /// empty without it.
    pub geo_url: Option<Url>,
    /// Remote OUI vendor table (CSV), fetched once at startup.
    pub oui_url: Url,
    /// Wireless interface to scan. `None` uses the first one found.
    pub interface: Option<String>,
    /// Settle time between triggering a scan and reading results.
    pub scan_settle: Duration,
    /// Idle delay between sampling cycles.
    pub scan_interval: Duration,
    /// Bound on every outbound HTTP request.
    pub request_timeout: Duration,
    /// Distance represented by the radar's outer ring, in meters.
    pub radar_max_range_m: f64,
    /// Placeholder speed used for approach-time estimates, in m/s.
    pub assumed_speed_mps: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            weather_url: Url::parse("http://api.weatherapi.com/v1/")
                .expect("default weather URL is valid"),
            weather_api_key: SecretString::from(String::new()),
            location: "auto:ip".into(),
            geo_url: None,
            oui_url: Url::parse("https://standards-oui.ieee.org/oui/oui.csv")
                .expect("default OUI URL is valid"),
            interface: None,
            scan_settle: Duration::from_secs(1),
            scan_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            radar_max_range_m: 500.0,
            assumed_speed_mps: 1.0,
        }
    }
}
