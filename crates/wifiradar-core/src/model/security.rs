//! Wireless security classification.

use serde::{Deserialize, Serialize};

/// Security scheme of an access point, derived from its AKM type code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum SecurityType {
    #[strum(serialize = "Open")]
    Open,
    #[strum(serialize = "WPA")]
    Wpa,
    #[strum(serialize = "WPA-PSK")]
    WpaPsk,
    #[strum(serialize = "WPA2")]
    Wpa2,
    #[strum(serialize = "WPA2-PSK")]
    Wpa2Psk,
    #[strum(serialize = "WPA3")]
    Wpa3,
    #[strum(serialize = "WPA3-SAE")]
    Wpa3Sae,
    #[strum(serialize = "WPA3-Enterprise")]
    Wpa3Enterprise,
    #[strum(serialize = "WPA2/WPA3 Mixed")]
    Mixed,
    #[strum(serialize = "Unknown")]
    Unknown,
}
