//! Pure signal model: security classification, distance estimation,
//! and environmental correction.
//!
//! Everything here is deterministic and total — no I/O, no failure
//! paths. Unrecognized inputs map to explicit fallbacks instead of
//! errors.

use crate::model::{EnvironmentalSample, SecurityType};

// ── AKM type codes ──────────────────────────────────────────────────

pub const AKM_TYPE_NONE: i32 = 0;
pub const AKM_TYPE_WPA: i32 = 1;
pub const AKM_TYPE_WPA_PSK: i32 = 2;
pub const AKM_TYPE_WPA2: i32 = 3;
pub const AKM_TYPE_WPA2_PSK: i32 = 4;
pub const AKM_TYPE_WPA2_PSK_ALT: i32 = 5;
pub const AKM_TYPE_WPA3: i32 = 6;
pub const AKM_TYPE_WPA3_SAE: i32 = 7;
pub const AKM_TYPE_WPA3_ENTERPRISE: i32 = 8;
pub const AKM_TYPE_MIXED: i32 = 9;

/// Sentinel for "the scan result carried no AKM entry at all".
pub const AKM_NONE_PRESENT: i32 = -1;

/// Map an AKM type code to a [`SecurityType`].
///
/// Fixed table; anything outside it — including the
/// [`AKM_NONE_PRESENT`] sentinel — is [`SecurityType::Unknown`].
pub fn classify_security(akm: i32) -> SecurityType {
    match akm {
        AKM_TYPE_NONE => SecurityType::Open,
        AKM_TYPE_WPA => SecurityType::Wpa,
        AKM_TYPE_WPA_PSK => SecurityType::WpaPsk,
        AKM_TYPE_WPA2 => SecurityType::Wpa2,
        AKM_TYPE_WPA2_PSK | AKM_TYPE_WPA2_PSK_ALT => SecurityType::Wpa2Psk,
        AKM_TYPE_WPA3 => SecurityType::Wpa3,
        AKM_TYPE_WPA3_SAE => SecurityType::Wpa3Sae,
        AKM_TYPE_WPA3_ENTERPRISE => SecurityType::Wpa3Enterprise,
        AKM_TYPE_MIXED => SecurityType::Mixed,
        _ => SecurityType::Unknown,
    }
}

// ── Distance model ──────────────────────────────────────────────────

/// Reference strength at 1 meter, in dBm.
const REFERENCE_DBM: f64 = -40.0;
/// Path-loss exponent for the log-distance model.
const PATH_LOSS_EXPONENT: f64 = 2.0;

/// Estimate distance in meters from raw signal strength.
///
/// Log-distance path-loss model: `10 ^ ((A − s) / (10·n))` with
/// A = −40 dBm and n = 2.0. Strictly decreasing in `signal_dbm` and
/// always positive; a −40 dBm reading is exactly 1 meter.
pub fn distance_from_signal(signal_dbm: i32) -> f64 {
    10f64.powf((REFERENCE_DBM - f64::from(signal_dbm)) / (10.0 * PATH_LOSS_EXPONENT))
}

// ── Environmental correction ────────────────────────────────────────

/// Multiplicative correction factor derived from humidity.
///
/// `1.0` (no-op) when the environmental sample is absent.
pub fn environment_factor(environment: Option<&EnvironmentalSample>) -> f64 {
    environment.map_or(1.0, |env| 1.0 + (env.humidity_pct / 100.0) * 0.1)
}

/// Apply the environmental correction to a raw signal reading.
///
/// Deliberately multiplicative: for negative dBm inputs a factor above
/// 1.0 produces a larger-magnitude (apparently stronger) value. That
/// asymmetry matches the documented model and must not be "fixed".
pub fn corrected_signal(signal_dbm: i32, environment: Option<&EnvironmentalSample>) -> f64 {
    f64::from(signal_dbm) * environment_factor(environment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(humidity_pct: f64) -> EnvironmentalSample {
        EnvironmentalSample {
            temperature_c: 20.0,
            humidity_pct,
            precipitation_mm: None,
            wind_kph: 10.0,
        }
    }

    #[test]
    fn minus_forty_dbm_is_exactly_one_meter() {
        assert!((distance_from_signal(-40) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn minus_seventy_dbm_is_ten_to_the_one_point_five() {
        let expected = 10f64.powf(1.5); // ≈ 31.62 m
        assert!((distance_from_signal(-70) - expected).abs() < 1e-9);
    }

    #[test]
    fn distance_is_strictly_decreasing_and_positive() {
        let mut previous = f64::INFINITY;
        for dbm in -100..=0 {
            let d = distance_from_signal(dbm);
            assert!(d > 0.0, "distance must be positive at {dbm} dBm");
            assert!(d < previous, "distance must shrink as signal strengthens");
            previous = d;
        }
    }

    #[test]
    fn corrected_signal_is_identity_without_environment() {
        for dbm in [-100, -70, -40, 0] {
            assert!((corrected_signal(dbm, None) - f64::from(dbm)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn corrected_signal_is_identity_at_zero_humidity() {
        let env = sample(0.0);
        assert!((corrected_signal(-60, Some(&env)) - (-60.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn corrected_signal_scales_linearly_with_humidity() {
        let env = sample(50.0);
        // factor = 1 + 0.5 * 0.1 = 1.05
        assert!((corrected_signal(-60, Some(&env)) - (-63.0)).abs() < 1e-9);

        let env = sample(100.0);
        // factor = 1.1 — larger magnitude for a negative input, by design
        assert!((corrected_signal(-60, Some(&env)) - (-66.0)).abs() < 1e-9);
    }

    #[test]
    fn classify_security_table() {
        assert_eq!(classify_security(AKM_TYPE_NONE), SecurityType::Open);
        assert_eq!(classify_security(AKM_TYPE_WPA), SecurityType::Wpa);
        assert_eq!(classify_security(AKM_TYPE_WPA_PSK), SecurityType::WpaPsk);
        assert_eq!(classify_security(AKM_TYPE_WPA2), SecurityType::Wpa2);
        assert_eq!(classify_security(AKM_TYPE_WPA2_PSK), SecurityType::Wpa2Psk);
        assert_eq!(
            classify_security(AKM_TYPE_WPA2_PSK_ALT),
            SecurityType::Wpa2Psk
        );
        assert_eq!(classify_security(AKM_TYPE_WPA3), SecurityType::Wpa3);
        assert_eq!(classify_security(AKM_TYPE_WPA3_SAE), SecurityType::Wpa3Sae);
        assert_eq!(
            classify_security(AKM_TYPE_WPA3_ENTERPRISE),
            SecurityType::Wpa3Enterprise
        );
        assert_eq!(classify_security(AKM_TYPE_MIXED), SecurityType::Mixed);
    }

    #[test]
    fn classify_security_unrecognized_and_sentinel_are_unknown() {
        assert_eq!(classify_security(AKM_NONE_PRESENT), SecurityType::Unknown);
        assert_eq!(classify_security(42), SecurityType::Unknown);
        assert_eq!(classify_security(i32::MIN), SecurityType::Unknown);
    }

    #[test]
    fn classify_security_is_idempotent() {
        for code in -2..12 {
            assert_eq!(classify_security(code), classify_security(code));
        }
    }
}
