//! Central sampling facade.
//!
//! [`Monitor`] owns the full lifecycle: adapter selection, vendor table
//! load, the background sampling loop, and reactive snapshot
//! publication through `watch` channels. Consumers copy the `Arc` out
//! of the channel and never hold a lock while rendering.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use wifiradar_api::{GeoClient, GeoPoint, WeatherClient};

use crate::adapter::{InterfaceInfo, NmcliAdapter, WirelessAdapter};
use crate::config::MonitorConfig;
use crate::environment::{EnvironmentSource, WeatherProvider};
use crate::error::CoreError;
use crate::model::{EnvironmentalSample, ScanSnapshot};
use crate::radar::RadarProjector;
use crate::scanner::Scanner;
use crate::vendor::VendorResolver;

/// Refresh interval for the environment poll task.
const ENVIRONMENT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ── SamplingState ────────────────────────────────────────────────

/// Sampling lifecycle observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingState {
    Idle,
    Sampling,
    /// The last cycle failed; the previous snapshot stays current
    /// until a cycle succeeds again.
    Degraded { reason: String },
}

// ── Monitor ──────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Does no I/O at
/// construction — call [`start()`](Self::start) to spawn the sampling
/// loop, or [`scan_once()`](Self::scan_once) for a single cycle.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    adapter: Arc<dyn WirelessAdapter>,
    environment: Arc<dyn EnvironmentSource>,
    geo: Option<GeoClient>,
    /// Built on first use — the vendor table fetch happens exactly once.
    scanner: Mutex<Option<Arc<Scanner>>>,
    /// Resolved scan interface, cached after the first resolution.
    interface: Mutex<Option<String>>,
    snapshot_tx: watch::Sender<Option<Arc<ScanSnapshot>>>,
    environment_tx: watch::Sender<Option<EnvironmentalSample>>,
    state_tx: watch::Sender<SamplingState>,
    cancel: CancellationToken,
    /// Child token for the current sampling run — cancelled on stop,
    /// replaced on restart (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Build a monitor with the production adapter and weather source.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let weather = WeatherClient::new(
            config.weather_url.clone(),
            config.weather_api_key.clone(),
            config.request_timeout,
        )?;
        let environment: Arc<dyn EnvironmentSource> =
            Arc::new(WeatherProvider::new(weather, config.location.clone()));
        let geo = match &config.geo_url {
            Some(url) => Some(GeoClient::new(url.clone(), config.request_timeout)?),
            None => None,
        };
        let adapter: Arc<dyn WirelessAdapter> = Arc::new(NmcliAdapter::new());

        Ok(Self::assemble(config, adapter, environment, geo, None))
    }

    /// Build from explicit parts. Used by tests to substitute fakes;
    /// the vendor table is taken as-is instead of fetched.
    pub fn with_parts(
        config: MonitorConfig,
        adapter: Arc<dyn WirelessAdapter>,
        environment: Arc<dyn EnvironmentSource>,
        vendors: VendorResolver,
    ) -> Self {
        Self::assemble(config, adapter, environment, None, Some(vendors))
    }

    fn assemble(
        config: MonitorConfig,
        adapter: Arc<dyn WirelessAdapter>,
        environment: Arc<dyn EnvironmentSource>,
        geo: Option<GeoClient>,
        vendors: Option<VendorResolver>,
    ) -> Self {
        let scanner = vendors.map(|v| {
            Arc::new(Scanner::new(
                Arc::clone(&adapter),
                v,
                config.scan_settle,
            ))
        });

        let (snapshot_tx, _) = watch::channel(None);
        let (environment_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(SamplingState::Idle);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(MonitorInner {
                config,
                adapter,
                environment,
                geo,
                scanner: Mutex::new(scanner),
                interface: Mutex::new(None),
                snapshot_tx,
                environment_tx,
                state_tx,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Radar projector configured for this monitor's range and speed.
    pub fn projector(&self) -> RadarProjector {
        RadarProjector::new(
            self.inner.config.radar_max_range_m,
            self.inner.config.assumed_speed_mps,
        )
    }

    // ── Sampling lifecycle ───────────────────────────────────────

    /// Start continuous sampling.
    ///
    /// Resolves the scan interface, loads the vendor table (first call
    /// only), and spawns the sampling loop plus the environment poll.
    /// Idempotent in effect: a second call while running spawns
    /// nothing new until [`stop()`](Self::stop).
    pub async fn start(&self) -> Result<(), CoreError> {
        // "Running" means live task handles exist. The state enum is
        // not a reliable guard: a degraded loop is still running.
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("sampling already active");
            return Ok(());
        }

        let interface = self.resolve_interface().await?;
        let scanner = self.ensure_scanner().await;

        // Fresh child token for this run (supports restart).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        handles.push(tokio::spawn(environment_task(
            self.clone(),
            child.clone(),
        )));
        handles.push(tokio::spawn(sampling_task(
            self.clone(),
            scanner,
            interface.clone(),
            child,
        )));
        drop(handles);

        self.inner.state_tx.send_replace(SamplingState::Sampling);
        info!(interface, "sampling started");
        Ok(())
    }

    /// Stop sampling and join the background tasks.
    ///
    /// The last published snapshot stays readable.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        self.inner.state_tx.send_replace(SamplingState::Idle);
        debug!("sampling stopped");
    }

    /// Run exactly one scan cycle and publish its snapshot.
    pub async fn scan_once(&self) -> Result<Arc<ScanSnapshot>, CoreError> {
        let interface = self.resolve_interface().await?;
        let scanner = self.ensure_scanner().await;
        let environment = self.inner.environment_tx.borrow().clone();

        let snapshot = Arc::new(
            scanner
                .scan_cycle(&interface, environment.as_ref())
                .await?,
        );
        self.inner
            .snapshot_tx
            .send_replace(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    // ── State observation ────────────────────────────────────────

    /// The most recently published snapshot, if any.
    pub fn latest_snapshot(&self) -> Option<Arc<ScanSnapshot>> {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot publications.
    pub fn snapshots(&self) -> watch::Receiver<Option<Arc<ScanSnapshot>>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Subscribe to sampling state changes.
    pub fn sampling_state(&self) -> watch::Receiver<SamplingState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to environment updates.
    pub fn environment(&self) -> watch::Receiver<Option<EnvironmentalSample>> {
        self.inner.environment_tx.subscribe()
    }

    // ── On-demand queries ────────────────────────────────────────

    /// Fetch current conditions immediately and publish them.
    pub async fn fetch_environment(&self) -> Option<EnvironmentalSample> {
        let sample = self.inner.environment.sample().await;
        self.inner.environment_tx.send_replace(sample.clone());
        sample
    }

    /// Find an external (USB) wireless interface, if one is present.
    pub async fn detect_usb_adapter(&self) -> Result<Option<InterfaceInfo>, CoreError> {
        let interfaces = self.inner.adapter.interfaces().await?;
        Ok(interfaces
            .into_iter()
            .find(|i| i.name.to_ascii_lowercase().contains("usb")))
    }

    /// Best-effort geolocation of a BSSID.
    ///
    /// `None` when no geolocation endpoint is configured, the source
    /// has no position, or the lookup fails.
    pub async fn locate(&self, bssid: &str) -> Option<GeoPoint> {
        let geo = self.inner.geo.as_ref()?;
        match geo.locate(bssid).await {
            Ok(point) => point,
            Err(e) => {
                warn!(bssid, error = %e, "geolocation lookup failed");
                None
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────

    async fn resolve_interface(&self) -> Result<String, CoreError> {
        let mut cached = self.inner.interface.lock().await;
        if let Some(name) = cached.as_ref() {
            return Ok(name.clone());
        }

        let name = match &self.inner.config.interface {
            Some(name) => name.clone(),
            None => {
                let interfaces = self.inner.adapter.interfaces().await?;
                interfaces
                    .into_iter()
                    .next()
                    .ok_or_else(|| CoreError::AdapterUnavailable {
                        reason: "no wireless interfaces found".into(),
                    })?
                    .name
            }
        };
        debug!(interface = %name, "resolved scan interface");
        *cached = Some(name.clone());
        Ok(name)
    }

    async fn ensure_scanner(&self) -> Arc<Scanner> {
        let mut guard = self.inner.scanner.lock().await;
        if let Some(scanner) = guard.as_ref() {
            return Arc::clone(scanner);
        }

        let vendors = VendorResolver::fetch(
            self.inner.config.oui_url.clone(),
            self.inner.config.request_timeout,
        )
        .await;
        let scanner = Arc::new(Scanner::new(
            Arc::clone(&self.inner.adapter),
            vendors,
            self.inner.config.scan_settle,
        ));
        *guard = Some(Arc::clone(&scanner));
        scanner
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Fixed-delay sampling loop: cycle, publish, idle, repeat.
///
/// A failed cycle flips the state to `Degraded` and keeps the previous
/// snapshot; the next successful cycle flips it back.
async fn sampling_task(
    monitor: Monitor,
    scanner: Arc<Scanner>,
    interface: String,
    cancel: CancellationToken,
) {
    loop {
        let environment = monitor.inner.environment_tx.borrow().clone();
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = scanner.scan_cycle(&interface, environment.as_ref()) => {
                match result {
                    Ok(snapshot) => {
                        monitor
                            .inner
                            .snapshot_tx
                            .send_replace(Some(Arc::new(snapshot)));
                        monitor
                            .inner
                            .state_tx
                            .send_if_modified(|state| {
                                if *state == SamplingState::Sampling {
                                    false
                                } else {
                                    *state = SamplingState::Sampling;
                                    true
                                }
                            });
                    }
                    Err(e) => {
                        warn!(error = %e, "scan cycle failed, keeping previous snapshot");
                        monitor.inner.state_tx.send_replace(SamplingState::Degraded {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(monitor.inner.config.scan_interval) => {}
        }
    }
    debug!("sampling task exited");
}

/// Periodic environment refresh feeding both the correction factor and
/// the status display.
async fn environment_task(monitor: Monitor, cancel: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            sample = monitor.inner.environment.sample() => {
                monitor.inner.environment_tx.send_replace(sample);
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(ENVIRONMENT_POLL_INTERVAL) => {}
        }
    }
    debug!("environment task exited");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapter::RawNetwork;

    struct FakeAdapter {
        interfaces: Vec<&'static str>,
        networks: Vec<RawNetwork>,
        fail_results: AtomicBool,
    }

    #[async_trait]
    impl WirelessAdapter for FakeAdapter {
        async fn interfaces(&self) -> Result<Vec<InterfaceInfo>, CoreError> {
            Ok(self
                .interfaces
                .iter()
                .map(|name| InterfaceInfo {
                    name: (*name).to_owned(),
                })
                .collect())
        }

        async fn trigger_scan(&self, _interface: &str) -> Result<(), CoreError> {
            Ok(())
        }

        async fn scan_results(&self, _interface: &str) -> Result<Vec<RawNetwork>, CoreError> {
            if self.fail_results.load(Ordering::SeqCst) {
                return Err(CoreError::AdapterUnavailable {
                    reason: "hardware gone".into(),
                });
            }
            Ok(self.networks.clone())
        }
    }

    struct FixedEnvironment(Option<EnvironmentalSample>);

    #[async_trait]
    impl EnvironmentSource for FixedEnvironment {
        async fn sample(&self) -> Option<EnvironmentalSample> {
            self.0.clone()
        }
    }

    fn network(ssid: &str, signal_dbm: i32) -> RawNetwork {
        RawNetwork {
            ssid: ssid.as_bytes().to_vec(),
            bssid: "AA:BB:CC:DD:EE:FF".to_owned(),
            frequency_mhz: 2412,
            signal_dbm,
            akm: vec![4],
        }
    }

    fn monitor_with(adapter: FakeAdapter, environment: FixedEnvironment) -> Monitor {
        Monitor::with_parts(
            MonitorConfig::default(),
            Arc::new(adapter),
            Arc::new(environment),
            VendorResolver::from_table(HashMap::new()),
        )
    }

    fn adapter_with(networks: Vec<RawNetwork>) -> FakeAdapter {
        FakeAdapter {
            interfaces: vec!["wlan0", "wlx00usb123"],
            networks,
            fail_results: AtomicBool::new(false),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scan_once_publishes_a_snapshot() {
        let monitor = monitor_with(
            adapter_with(vec![network("Office", -55)]),
            FixedEnvironment(None),
        );

        assert!(monitor.latest_snapshot().is_none());
        let snapshot = monitor.scan_once().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            monitor.latest_snapshot().unwrap().access_points[0].ssid,
            "Office"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn start_publishes_snapshots_until_stopped() {
        let monitor = monitor_with(
            adapter_with(vec![network("Office", -55)]),
            FixedEnvironment(None),
        );
        let mut snapshots = monitor.snapshots();

        monitor.start().await.unwrap();
        assert_eq!(*monitor.sampling_state().borrow(), SamplingState::Sampling);

        snapshots.changed().await.unwrap();
        assert!(snapshots.borrow_and_update().is_some());

        monitor.stop().await;
        assert_eq!(*monitor.sampling_state().borrow(), SamplingState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_degrades_and_keeps_previous_snapshot() {
        let adapter = Arc::new(adapter_with(vec![network("Office", -55)]));
        let monitor = Monitor::with_parts(
            MonitorConfig::default(),
            Arc::clone(&adapter) as Arc<dyn WirelessAdapter>,
            Arc::new(FixedEnvironment(None)),
            VendorResolver::from_table(HashMap::new()),
        );

        let mut snapshots = monitor.snapshots();
        let mut state = monitor.sampling_state();
        monitor.start().await.unwrap();

        // First cycle succeeds and publishes.
        snapshots.changed().await.unwrap();
        let published = snapshots.borrow_and_update().clone().unwrap();
        assert_eq!(published.len(), 1);

        // Break the adapter; the loop reports degradation but the
        // previous snapshot stays current.
        adapter.fail_results.store(true, Ordering::SeqCst);
        loop {
            state.changed().await.unwrap();
            let current = state.borrow_and_update().clone();
            if matches!(current, SamplingState::Degraded { .. }) {
                break;
            }
        }
        assert!(monitor.latest_snapshot().is_some());

        monitor.stop().await;
        assert_eq!(*monitor.sampling_state().borrow(), SamplingState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_while_degraded_spawns_nothing_and_stop_returns() {
        let adapter = Arc::new(adapter_with(vec![network("Office", -55)]));
        let monitor = Monitor::with_parts(
            MonitorConfig::default(),
            Arc::clone(&adapter) as Arc<dyn WirelessAdapter>,
            Arc::new(FixedEnvironment(None)),
            VendorResolver::from_table(HashMap::new()),
        );

        let mut snapshots = monitor.snapshots();
        let mut state = monitor.sampling_state();
        monitor.start().await.unwrap();
        snapshots.changed().await.unwrap();

        adapter.fail_results.store(true, Ordering::SeqCst);
        loop {
            state.changed().await.unwrap();
            if matches!(
                state.borrow_and_update().clone(),
                SamplingState::Degraded { .. }
            ) {
                break;
            }
        }

        // A degraded loop is still running; this must be a no-op and
        // must not strand the first run's tasks on an orphaned token.
        monitor.start().await.unwrap();
        assert_eq!(monitor.inner.task_handles.lock().await.len(), 2);

        monitor.stop().await;
        assert_eq!(*monitor.sampling_state().borrow(), SamplingState::Idle);
        assert!(monitor.inner.task_handles.lock().await.is_empty());

        // The monitor restarts cleanly once the adapter recovers.
        adapter.fail_results.store(false, Ordering::SeqCst);
        monitor.start().await.unwrap();
        snapshots.changed().await.unwrap();
        assert!(snapshots.borrow_and_update().is_some());
        monitor.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn environment_sample_feeds_the_correction() {
        let env = EnvironmentalSample {
            temperature_c: 20.0,
            humidity_pct: 100.0,
            precipitation_mm: None,
            wind_kph: 5.0,
        };
        let monitor = monitor_with(
            adapter_with(vec![network("Office", -60)]),
            FixedEnvironment(Some(env)),
        );

        monitor.fetch_environment().await.unwrap();
        let snapshot = monitor.scan_once().await.unwrap();
        let ap = &snapshot.access_points[0];
        assert_eq!(ap.signal_dbm, -60);
        assert!((ap.affected_signal_dbm - (-66.0)).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn detect_usb_adapter_matches_by_name() {
        let monitor = monitor_with(adapter_with(Vec::new()), FixedEnvironment(None));
        let usb = monitor.detect_usb_adapter().await.unwrap();
        assert_eq!(usb.unwrap().name, "wlx00usb123");
    }

    #[tokio::test(start_paused = true)]
    async fn no_interfaces_is_an_adapter_error() {
        let adapter = FakeAdapter {
            interfaces: Vec::new(),
            networks: Vec::new(),
            fail_results: AtomicBool::new(false),
        };
        let monitor = monitor_with(adapter, FixedEnvironment(None));
        let err = monitor.scan_once().await.unwrap_err();
        assert!(matches!(err, CoreError::AdapterUnavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn locate_without_endpoint_is_none() {
        let monitor = monitor_with(adapter_with(Vec::new()), FixedEnvironment(None));
        assert!(monitor.locate("AA:BB:CC:DD:EE:FF").await.is_none());
    }
}
