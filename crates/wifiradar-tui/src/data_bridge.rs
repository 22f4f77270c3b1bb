//! Data bridge — connects [`Monitor`] watch channels to TUI actions.
//!
//! Runs as a background task: starts sampling, subscribes to snapshot,
//! environment, and state channels, and forwards every change as an
//! [`Action`] through the TUI's action channel. Geolocation lookups
//! arrive as requests on a side channel so the render loop never
//! awaits the network.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use wifiradar_core::{Monitor, SamplingState};

use crate::action::Action;

/// Run the bridge until cancelled.
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    mut locate_rx: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) {
    // One-time USB adapter probe; purely informational.
    match monitor.detect_usb_adapter().await {
        Ok(found) => {
            let _ = action_tx.send(Action::UsbAdapterDetected(found.map(|i| i.name)));
        }
        Err(e) => {
            warn!(error = %e, "USB adapter probe failed");
            let _ = action_tx.send(Action::UsbAdapterDetected(None));
        }
    }

    if let Err(e) = monitor.start().await {
        warn!(error = %e, "failed to start sampling");
        let _ = action_tx.send(Action::SamplingChanged(SamplingState::Degraded {
            reason: e.to_string(),
        }));
        return;
    }

    let mut snapshots = monitor.snapshots();
    let mut environment = monitor.environment();
    let mut state = monitor.sampling_state();

    // Push whatever is already published so screens have data immediately.
    if let Some(snapshot) = monitor.latest_snapshot() {
        let _ = action_tx.send(Action::SnapshotUpdated(snapshot));
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = snapshots.changed() => {
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    let _ = action_tx.send(Action::SnapshotUpdated(snapshot));
                }
            }
            Ok(()) = environment.changed() => {
                let sample = environment.borrow_and_update().clone();
                let _ = action_tx.send(Action::EnvironmentUpdated(sample));
            }
            Ok(()) = state.changed() => {
                let current = state.borrow_and_update().clone();
                let _ = action_tx.send(Action::SamplingChanged(current));
            }
            Some(bssid) = locate_rx.recv() => {
                let point = monitor.locate(&bssid).await;
                let _ = action_tx.send(Action::GeoResolved { bssid, point });
            }
        }
    }

    monitor.stop().await;
    debug!("data bridge shut down");
}
