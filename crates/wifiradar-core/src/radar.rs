//! Polar projection of snapshots for the radar display.
//!
//! Scans carry no direction information, so bearings are synthetic:
//! slot `i` of `N` sits at `i · 2π/N`. The angle is a display artifact
//! tied to snapshot ordering, not a physical estimate.

use std::f64::consts::TAU;

use crate::model::ScanSnapshot;

/// Whether a device is treated as in motion.
///
/// Purely heuristic: anything resolved to the mobile fallback vendor
/// counts as moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MotionStatus {
    #[strum(serialize = "Moving")]
    Moving,
    #[strum(serialize = "Stable")]
    Stable,
}

/// One access point placed on the radar.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarSlot {
    pub ssid: String,
    pub bssid: String,
    pub signal_dbm: i32,
    pub distance_m: f64,
    /// Radial position as a fraction of the outer ring, capped at 0.95
    /// so out-of-range points hug the rim instead of leaving the dial.
    pub range_fraction: f64,
    /// Synthetic bearing in radians, counterclockwise from east.
    pub bearing_rad: f64,
    /// Walking time to reach the device at the assumed speed, minutes.
    pub approach_minutes: f64,
    pub motion: MotionStatus,
}

impl RadarSlot {
    /// Cartesian position on a dial of the given radius.
    pub fn position(&self, radius: f64) -> (f64, f64) {
        let r = self.range_fraction * radius;
        (r * self.bearing_rad.cos(), r * self.bearing_rad.sin())
    }
}

/// Maps snapshots into radar slots.
#[derive(Debug, Clone, Copy)]
pub struct RadarProjector {
    max_range_m: f64,
    assumed_speed_mps: f64,
}

/// Fraction of the dial radius reserved as the clamping rim.
const RIM_FRACTION: f64 = 0.95;

impl RadarProjector {
    pub fn new(max_range_m: f64, assumed_speed_mps: f64) -> Self {
        Self {
            max_range_m,
            assumed_speed_mps,
        }
    }

    pub fn max_range_m(&self) -> f64 {
        self.max_range_m
    }

    pub fn assumed_speed_mps(&self) -> f64 {
        self.assumed_speed_mps
    }

    /// Project every access point in `snapshot` onto the dial.
    ///
    /// Slots keep snapshot order, so a given access point holds its
    /// bearing for as long as its position in the scan output is
    /// stable. An empty snapshot projects to no slots.
    pub fn project(&self, snapshot: &ScanSnapshot) -> Vec<RadarSlot> {
        let count = snapshot.len();
        snapshot
            .access_points
            .iter()
            .enumerate()
            .map(|(i, ap)| {
                #[allow(clippy::cast_precision_loss)]
                let bearing_rad = (i as f64) * TAU / (count as f64);
                RadarSlot {
                    ssid: ap.ssid.clone(),
                    bssid: ap.bssid.clone(),
                    signal_dbm: ap.signal_dbm,
                    distance_m: ap.distance_m,
                    range_fraction: (ap.distance_m / self.max_range_m).min(RIM_FRACTION),
                    bearing_rad,
                    approach_minutes: ap.distance_m / (self.assumed_speed_mps * 60.0),
                    motion: motion_of(&ap.vendor_make),
                }
            })
            .collect()
    }
}

fn motion_of(vendor_make: &str) -> MotionStatus {
    if vendor_make.to_ascii_lowercase().contains("mobile") {
        MotionStatus::Moving
    } else {
        MotionStatus::Stable
    }
}
