// Best-effort BSSID geolocation client.
//
// Response envelope: {"result": <code>, "data": {"lon": .., "lat": ..}}
// where result == 50 signals success. Anything else is "unavailable",
// not an error — position data is strictly optional.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::Error;

/// A resolved longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize)]
struct GeoResponse {
    result: i64,
    #[serde(default)]
    data: Option<GeoData>,
}

#[derive(Deserialize)]
struct GeoData {
    lon: f64,
    lat: f64,
}

const RESULT_OK: i64 = 50;

/// Async client for the geolocation-by-BSSID source.
#[derive(Clone)]
pub struct GeoClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GeoClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (tests, shared pools).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Look up the position of `bssid`.
    ///
    /// `Ok(None)` means the source answered but has no position for
    /// this hardware identifier; transport and parse failures are
    /// still [`Error`]s so the caller can log them.
    pub async fn locate(&self, bssid: &str) -> Result<Option<GeoPoint>, Error> {
        debug!("GET {} bssid={bssid}", self.base_url);

        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("bssid", bssid)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                endpoint: "geolocate",
                status: status.as_u16(),
            });
        }

        let body: GeoResponse = resp
            .json()
            .await
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
            })?;

        Ok(match (body.result, body.data) {
            (RESULT_OK, Some(data)) => Some(GeoPoint {
                longitude: data.lon,
                latitude: data.lat,
            }),
            _ => None,
        })
    }
}
