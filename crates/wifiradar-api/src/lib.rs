//! Async HTTP clients for the external data sources wifiradar consumes:
//!
//! - **[`WeatherClient`]** — current conditions (temperature, humidity,
//!   precipitation, wind) from a WeatherAPI-compatible endpoint. The
//!   signal pipeline uses these to derive an environmental correction
//!   factor.
//! - **[`GeoClient`]** — best-effort longitude/latitude lookup for an
//!   access point's BSSID.
//! - **[`OuiClient`]** — one-shot download of the IEEE OUI assignment
//!   table for vendor identity resolution.
//!
//! All clients carry a bounded request timeout; callers in
//! `wifiradar-core` are expected to degrade gracefully on [`Error`]
//! rather than propagate it into the sampling loop.

pub mod error;
pub mod geo;
pub mod oui;
pub mod weather;

pub use error::Error;
pub use geo::{GeoClient, GeoPoint};
pub use oui::OuiClient;
pub use weather::{CurrentConditions, WeatherClient};
