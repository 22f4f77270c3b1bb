//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use wifiradar_core::{EnvironmentalSample, GeoPoint, SamplingState, ScanSnapshot};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Data Events (from the monitor's watch channels) ───────────
    SnapshotUpdated(Arc<ScanSnapshot>),
    EnvironmentUpdated(Option<EnvironmentalSample>),
    SamplingChanged(SamplingState),
    /// A USB wireless adapter was (or wasn't) found at startup.
    UsbAdapterDetected(Option<String>),

    // ── Geolocation ───────────────────────────────────────────────
    /// Ask the bridge to resolve a BSSID's position.
    RequestLocate(String),
    /// Lookup finished; `None` means unavailable.
    GeoResolved {
        bssid: String,
        point: Option<GeoPoint>,
    },

    // ── Selection ─────────────────────────────────────────────────
    /// Open the detail screen for an access point.
    OpenDetail(String),

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,
}
