// Hand-crafted async client for a WeatherAPI-compatible current-conditions
// endpoint (current.json).
//
// Auth: `key` query parameter. Location: `q` query parameter, where the
// sentinel "auto:ip" asks the provider to geolocate by source IP.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::Error;

/// The four numeric fields the signal pipeline consumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub humidity: f64,
    #[serde(default)]
    pub precip_mm: Option<f64>,
    pub wind_kph: f64,
}

#[derive(Deserialize)]
struct WeatherResponse {
    current: CurrentConditions,
}

/// Async client for the weather data source.
///
/// One GET per fetch, bounded by the configured timeout. Safe to call
/// at high frequency — there is no client-side caching, but a request
/// can never stall its caller past the timeout.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl WeatherClient {
    /// Build a client against `base_url` (e.g. `http://api.weatherapi.com/v1/`).
    pub fn new(base_url: Url, api_key: SecretString, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Wrap an existing `reqwest::Client` (tests, shared pools).
    pub fn with_client(http: reqwest::Client, base_url: Url, api_key: SecretString) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Fetch current conditions for `location`.
    ///
    /// Any non-2xx response or malformed body is an [`Error`] — the
    /// caller decides whether that degrades or propagates.
    pub async fn current(&self, location: &str) -> Result<CurrentConditions, Error> {
        let url = self.base_url.join("current.json")?;
        debug!("GET {url} q={location}");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("q", location),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                endpoint: "current.json",
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let parsed: WeatherResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", body_preview(&body)),
            })?;

        Ok(parsed.current)
    }
}

/// First 200 characters of a response body for error context.
/// Character-based, so the cut can never land inside a multi-byte
/// sequence.
fn body_preview(body: &str) -> String {
    body.chars().take(200).collect()
}
