//! Environmental sampling.
//!
//! [`EnvironmentSource`] abstracts "give me the current conditions, or
//! nothing". A failed fetch is not an error anywhere in the pipeline;
//! it degrades to `None` and the correction factor becomes a no-op.

use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

use wifiradar_api::WeatherClient;

use crate::model::EnvironmentalSample;

/// Source of environmental conditions for signal correction.
#[async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Fetch current conditions. `None` on any failure.
    async fn sample(&self) -> Option<EnvironmentalSample>;
}

/// [`EnvironmentSource`] backed by the remote weather API.
pub struct WeatherProvider {
    client: WeatherClient,
    location: String,
}

impl WeatherProvider {
    pub fn new(client: WeatherClient, location: impl Into<String>) -> Self {
        Self {
            client,
            location: location.into(),
        }
    }
}

#[async_trait]
impl EnvironmentSource for WeatherProvider {
    async fn sample(&self) -> Option<EnvironmentalSample> {
        match self.client.current(&self.location).await {
            Ok(conditions) => Some(EnvironmentalSample {
                // Sensor-style wobble on the instantaneous readings.
                temperature_c: jitter_reading(conditions.temp_c),
                humidity_pct: conditions.humidity,
                precipitation_mm: conditions.precip_mm,
                wind_kph: jitter_reading(conditions.wind_kph),
            }),
            Err(e) => {
                warn!(location = %self.location, error = %e, "weather fetch failed");
                None
            }
        }
    }
}

/// Perturb a reading by a uniform ±0.5 offset, rounded to two decimal
/// places. Humidity is exempt — the correction factor reads it as-is.
fn jitter_reading(value: f64) -> f64 {
    let offset: f64 = rand::rng().random_range(-0.5..=0.5);
    ((value + offset) * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_within_half_a_unit() {
        for _ in 0..1000 {
            let v = jitter_reading(21.0);
            assert!((v - 21.0).abs() <= 0.5 + 1e-9, "got {v}");
        }
    }

    #[test]
    fn jitter_rounds_to_two_decimals() {
        for _ in 0..100 {
            let v = jitter_reading(12.345);
            let scaled = v * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9, "got {v}");
        }
    }
}
