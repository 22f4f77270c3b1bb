//! One scan cycle: trigger, settle, read, derive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::adapter::{RawNetwork, WirelessAdapter};
use crate::error::CoreError;
use crate::model::{AccessPointObservation, EnvironmentalSample, ScanSnapshot};
use crate::signal::{self, AKM_NONE_PRESENT};
use crate::vendor::VendorResolver;

/// Placeholder shown when an SSID is not valid UTF-8.
const ENCODING_ERROR_PLACEHOLDER: &str = "[Encoding Error]";

/// Executes scan cycles against a wireless adapter.
///
/// Stateless between cycles; every call produces a complete, freshly
/// derived [`ScanSnapshot`].
pub struct Scanner {
    adapter: Arc<dyn WirelessAdapter>,
    vendors: VendorResolver,
    settle: Duration,
}

impl Scanner {
    pub fn new(adapter: Arc<dyn WirelessAdapter>, vendors: VendorResolver, settle: Duration) -> Self {
        Self {
            adapter,
            vendors,
            settle,
        }
    }

    /// Run one full cycle on `interface`.
    ///
    /// Triggers a hardware refresh, waits the settle interval so the
    /// refresh has results to report, then assembles one observation
    /// per visible access point. Adapter failures abort the cycle;
    /// the caller keeps its previous snapshot.
    pub async fn scan_cycle(
        &self,
        interface: &str,
        environment: Option<&EnvironmentalSample>,
    ) -> Result<ScanSnapshot, CoreError> {
        self.adapter.trigger_scan(interface).await?;
        tokio::time::sleep(self.settle).await;
        let raw = self.adapter.scan_results(interface).await?;
        debug!(interface, count = raw.len(), "scan cycle complete");

        let access_points = raw
            .into_iter()
            .map(|network| self.observe(network, environment))
            .collect();

        Ok(ScanSnapshot {
            captured_at: Utc::now(),
            access_points,
        })
    }

    fn observe(
        &self,
        raw: RawNetwork,
        environment: Option<&EnvironmentalSample>,
    ) -> AccessPointObservation {
        let (vendor_make, vendor_model) = self.vendors.resolve(&raw.bssid);
        let akm = raw.akm.first().copied().unwrap_or(AKM_NONE_PRESENT);

        AccessPointObservation {
            ssid: sanitize_ssid(&raw.ssid),
            frequency_ghz: f64::from(raw.frequency_mhz) / 1000.0,
            signal_dbm: raw.signal_dbm,
            affected_signal_dbm: signal::corrected_signal(raw.signal_dbm, environment),
            distance_m: signal::distance_from_signal(raw.signal_dbm),
            vendor_make,
            vendor_model,
            security: signal::classify_security(akm),
            bssid: raw.bssid,
        }
    }
}

/// Decode an SSID, substituting a visible placeholder when the bytes
/// are not valid UTF-8. Hidden networks (empty SSID) stay empty.
fn sanitize_ssid(bytes: &[u8]) -> String {
    std::str::from_utf8(bytes).map_or_else(|_| ENCODING_ERROR_PLACEHOLDER.to_owned(), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapter::InterfaceInfo;
    use crate::model::SecurityType;

    struct FakeAdapter {
        networks: Vec<RawNetwork>,
        triggers: AtomicUsize,
    }

    impl FakeAdapter {
        fn with(networks: Vec<RawNetwork>) -> Arc<Self> {
            Arc::new(Self {
                networks,
                triggers: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WirelessAdapter for FakeAdapter {
        async fn interfaces(&self) -> Result<Vec<InterfaceInfo>, CoreError> {
            Ok(vec![InterfaceInfo {
                name: "wlan0".into(),
            }])
        }

        async fn trigger_scan(&self, _interface: &str) -> Result<(), CoreError> {
            self.triggers.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn scan_results(&self, _interface: &str) -> Result<Vec<RawNetwork>, CoreError> {
            Ok(self.networks.clone())
        }
    }

    fn raw(ssid: &[u8], bssid: &str, signal_dbm: i32, akm: Vec<i32>) -> RawNetwork {
        RawNetwork {
            ssid: ssid.to_vec(),
            bssid: bssid.to_owned(),
            frequency_mhz: 5180,
            signal_dbm,
            akm,
        }
    }

    fn scanner(adapter: Arc<FakeAdapter>) -> Scanner {
        let vendors = VendorResolver::from_table(HashMap::from([(
            "00000C".to_owned(),
            "Cisco Systems, Inc".to_owned(),
        )]));
        Scanner::new(adapter, vendors, Duration::from_secs(1))
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_triggers_then_reads() {
        let adapter = FakeAdapter::with(vec![raw(b"Office", "00:00:0C:11:22:33", -40, vec![4])]);
        let snapshot = scanner(Arc::clone(&adapter))
            .scan_cycle("wlan0", None)
            .await
            .unwrap();

        assert_eq!(adapter.triggers.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.len(), 1);

        let ap = &snapshot.access_points[0];
        assert_eq!(ap.ssid, "Office");
        assert_eq!(ap.bssid, "00:00:0C:11:22:33");
        assert!((ap.frequency_ghz - 5.18).abs() < 1e-9);
        assert_eq!(ap.signal_dbm, -40);
        assert!((ap.distance_m - 1.0).abs() < 1e-9);
        assert_eq!(ap.vendor_make, "Cisco Systems, Inc");
        assert_eq!(ap.vendor_model, "Model of Cisco Systems, Inc");
        assert_eq!(ap.security, SecurityType::Wpa2Psk);
        // No environment sample, so corrected equals raw.
        assert!((ap.affected_signal_dbm - (-40.0)).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn environment_sample_shifts_affected_signal_only() {
        let adapter = FakeAdapter::with(vec![raw(b"Office", "00:00:0C:11:22:33", -60, vec![4])]);
        let env = EnvironmentalSample {
            temperature_c: 20.0,
            humidity_pct: 50.0,
            precipitation_mm: None,
            wind_kph: 5.0,
        };
        let snapshot = scanner(adapter)
            .scan_cycle("wlan0", Some(&env))
            .await
            .unwrap();

        let ap = &snapshot.access_points[0];
        assert_eq!(ap.signal_dbm, -60);
        assert!((ap.affected_signal_dbm - (-63.0)).abs() < 1e-9);
        // Distance derives from the raw reading, not the corrected one.
        assert!((ap.distance_m - distance_at(-60)).abs() < 1e-9);
    }

    fn distance_at(dbm: i32) -> f64 {
        crate::signal::distance_from_signal(dbm)
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_utf8_ssid_gets_placeholder() {
        let adapter = FakeAdapter::with(vec![raw(&[0xff, 0xfe, 0x41], "DE:AD:BE:EF:00:01", -70, vec![])]);
        let snapshot = scanner(adapter).scan_cycle("wlan0", None).await.unwrap();

        let ap = &snapshot.access_points[0];
        assert_eq!(ap.ssid, "[Encoding Error]");
        // No AKM entry at all reports as Unknown, not Open.
        assert_eq!(ap.security, SecurityType::Unknown);
        assert_eq!(ap.vendor_make, "Mobile");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_scan_produces_empty_snapshot() {
        let adapter = FakeAdapter::with(Vec::new());
        let snapshot = scanner(adapter).scan_cycle("wlan0", None).await.unwrap();
        assert!(snapshot.is_empty());
    }
}
