//! Scanning pipeline and domain model for the wifiradar workspace.
//!
//! This crate owns everything with algorithmic content:
//!
//! - **[`Monitor`]** — Central facade managing the sampling lifecycle:
//!   [`start()`](Monitor::start) spawns the background sampling loop
//!   that polls the wireless adapter on a fixed-delay cycle and
//!   publishes each completed [`ScanSnapshot`] through a `watch`
//!   channel. Readers copy the `Arc` out and never hold a lock while
//!   rendering.
//!
//! - **Signal model** ([`signal`]) — pure functions mapping raw radio
//!   measurements to physical-distance estimates (log-distance path
//!   loss), applying the environmental correction factor, and
//!   classifying AKM security codes.
//!
//! - **[`Scanner`]** — one scan cycle: trigger the adapter, wait the
//!   settle interval, assemble one observation per visible access
//!   point (sanitized text, corrected signal, distance, vendor
//!   identity, security type).
//!
//! - **[`RadarProjector`]** — maps distances into 2D polar display
//!   slots with synthetic equal-spaced bearings, approach-time and
//!   motion-status derivations.
//!
//! - **Seams** — [`WirelessAdapter`] and [`EnvironmentSource`] traits
//!   decouple the pipeline from `nmcli` and the weather service so
//!   tests can substitute deterministic fakes.

pub mod adapter;
pub mod config;
pub mod environment;
pub mod error;
pub mod model;
pub mod monitor;
pub mod radar;
pub mod scanner;
pub mod signal;
pub mod vendor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::{InterfaceInfo, NmcliAdapter, RawNetwork, WirelessAdapter};
pub use config::MonitorConfig;
pub use environment::{EnvironmentSource, WeatherProvider};
pub use error::CoreError;
pub use model::{AccessPointObservation, EnvironmentalSample, ScanSnapshot, SecurityType};
pub use monitor::{Monitor, SamplingState};
pub use radar::{MotionStatus, RadarProjector, RadarSlot};
pub use scanner::Scanner;
pub use vendor::VendorResolver;

// Re-export the geolocation point so consumers don't need to depend
// on wifiradar-api directly.
pub use wifiradar_api::GeoPoint;
