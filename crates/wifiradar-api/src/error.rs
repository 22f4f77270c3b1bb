//! Error type shared by all API clients.

/// Errors surfaced by the HTTP clients.
///
/// None of these are fatal to the application — `wifiradar-core`
/// converts them into degraded defaults (no environmental correction,
/// fallback vendor identity, absent geolocation).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: u16,
    },

    /// The body could not be parsed into the expected shape.
    #[error("response deserialization failed: {message}")]
    Deserialization { message: String },

    /// A base or joined URL was invalid.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
