//! TUI-owned configuration: TOML file + environment merge, and
//! translation to `wifiradar_core::MonitorConfig`.
//!
//! Core never sees these types — it receives a pre-built `MonitorConfig`.

use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use wifiradar_core::MonitorConfig;

// ── TOML config struct ───────────────────────────────────────────────

/// File/environment configuration for the radar TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Weather API base URL.
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Weather API key (prefer the WIFIRADAR_WEATHER_API_KEY env var).
    pub weather_api_key: Option<String>,

    /// Location token for the weather source.
    #[serde(default = "default_location")]
    pub location: String,

    /// Geolocation-by-BSSID endpoint. Optional.
    pub geo_url: Option<String>,

    /// Remote OUI vendor table (CSV).
    #[serde(default = "default_oui_url")]
    pub oui_url: String,

    /// Wireless interface to scan. Defaults to the first one found.
    pub interface: Option<String>,

    /// Settle time between trigger and read, seconds.
    #[serde(default = "default_one")]
    pub scan_settle_secs: u64,

    /// Idle delay between sampling cycles, seconds.
    #[serde(default = "default_one")]
    pub scan_interval_secs: u64,

    /// Bound on every outbound HTTP request, seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Distance represented by the radar's outer ring, meters.
    #[serde(default = "default_range")]
    pub radar_max_range_m: f64,

    /// Assumed walking speed for approach estimates, m/s.
    #[serde(default = "default_speed")]
    pub assumed_speed_mps: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            weather_api_key: None,
            location: default_location(),
            geo_url: None,
            oui_url: default_oui_url(),
            interface: None,
            scan_settle_secs: default_one(),
            scan_interval_secs: default_one(),
            timeout_secs: default_timeout(),
            radar_max_range_m: default_range(),
            assumed_speed_mps: default_speed(),
        }
    }
}

fn default_weather_url() -> String {
    "http://api.weatherapi.com/v1/".into()
}
fn default_location() -> String {
    "auto:ip".into()
}
fn default_oui_url() -> String {
    "https://standards-oui.ieee.org/oui/oui.csv".into()
}
fn default_one() -> u64 {
    1
}
fn default_timeout() -> u64 {
    5
}
fn default_range() -> f64 {
    500.0
}
fn default_speed() -> f64 {
    1.0
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wifiradar", "wifiradar")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("wifiradar");
            p.push("config.toml");
            p
        })
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the Config from file + environment (`WIFIRADAR_` prefix).
pub fn load_config() -> Result<Config> {
    load_from(&config_path())
}

fn load_from(path: &std::path::Path) -> Result<Config> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIFIRADAR_"));

    figment.extract().wrap_err("invalid configuration")
}

impl Config {
    /// Translate into a core `MonitorConfig`.
    ///
    /// This is the single boundary where TUI config types cross into
    /// core types.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig> {
        let weather_url: Url = self
            .weather_url
            .parse()
            .wrap_err_with(|| format!("invalid weather_url: {}", self.weather_url))?;
        let oui_url: Url = self
            .oui_url
            .parse()
            .wrap_err_with(|| format!("invalid oui_url: {}", self.oui_url))?;
        let geo_url = match &self.geo_url {
            Some(raw) => Some(
                raw.parse()
                    .wrap_err_with(|| format!("invalid geo_url: {raw}"))?,
            ),
            None => None,
        };

        Ok(MonitorConfig {
            weather_url,
            weather_api_key: SecretString::from(
                self.weather_api_key.clone().unwrap_or_default(),
            ),
            location: self.location.clone(),
            geo_url,
            oui_url,
            interface: self.interface.clone(),
            scan_settle: Duration::from_secs(self.scan_settle_secs),
            scan_interval: Duration::from_secs(self.scan_interval_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            radar_max_range_m: self.radar_max_range_m,
            assumed_speed_mps: self.assumed_speed_mps,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_translate_to_monitor_config() {
        let cfg = Config::default();
        let monitor = cfg.to_monitor_config().unwrap();
        assert_eq!(monitor.location, "auto:ip");
        assert_eq!(monitor.scan_interval, Duration::from_secs(1));
        assert!(monitor.geo_url.is_none());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "location = \"Berlin\"\nscan_interval_secs = 3\ninterface = \"wlan1\""
        )
        .unwrap();

        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.location, "Berlin");
        assert_eq!(cfg.scan_interval_secs, 3);
        assert_eq!(cfg.interface.as_deref(), Some("wlan1"));
        // Untouched fields keep their defaults.
        assert_eq!(cfg.weather_url, default_weather_url());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let cfg = Config {
            weather_url: "not a url".into(),
            ..Config::default()
        };
        assert!(cfg.to_monitor_config().is_err());
    }
}
