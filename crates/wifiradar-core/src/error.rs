//! Error type for the scanning pipeline.
//!
//! Only adapter-level failures surface as errors — they fail a scan
//! cycle atomically. Weather, geolocation, vendor-lookup, and text
//! encoding failures are recovered in place with degraded defaults
//! and never reach this type.

/// Errors surfaced by the scanning pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No usable wireless interface (missing hardware, permissions).
    #[error("wireless adapter unavailable: {reason}")]
    AdapterUnavailable { reason: String },

    /// The adapter command could not be spawned or read.
    #[error("adapter command failed: {0}")]
    AdapterCommand(#[from] std::io::Error),

    /// The adapter produced output we could not interpret.
    #[error("could not parse scan output: {0}")]
    ScanParse(String),

    /// An API client failed while building the pipeline (startup only).
    #[error(transparent)]
    Api(#[from] wifiradar_api::Error),
}
