//! Wireless adapter access.
//!
//! [`WirelessAdapter`] is the seam between the scanning pipeline and
//! the platform's wireless stack; [`NmcliAdapter`] implements it by
//! shelling out to NetworkManager's `nmcli` in terse mode. Tests
//! substitute deterministic fakes through the trait.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::signal::{
    AKM_TYPE_MIXED, AKM_TYPE_NONE, AKM_TYPE_WPA, AKM_TYPE_WPA2, AKM_TYPE_WPA2_PSK,
    AKM_TYPE_WPA3, AKM_TYPE_WPA3_ENTERPRISE, AKM_TYPE_WPA3_SAE, AKM_TYPE_WPA_PSK,
};

/// One wireless-capable interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
}

/// One raw scan result, before any derivation.
///
/// The SSID stays as raw bytes here — sanitization (and the encoding
/// failure placeholder) is the scanner's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNetwork {
    pub ssid: Vec<u8>,
    pub bssid: String,
    pub frequency_mhz: u32,
    pub signal_dbm: i32,
    /// AKM type codes; empty when the result carried no security info.
    pub akm: Vec<i32>,
}

/// Platform wireless scanning capability.
#[async_trait]
pub trait WirelessAdapter: Send + Sync {
    /// Enumerate wireless interfaces.
    async fn interfaces(&self) -> Result<Vec<InterfaceInfo>, CoreError>;

    /// Ask the hardware to refresh its scan results.
    async fn trigger_scan(&self, interface: &str) -> Result<(), CoreError>;

    /// Retrieve the most recent scan results.
    async fn scan_results(&self, interface: &str) -> Result<Vec<RawNetwork>, CoreError>;
}

// ── nmcli implementation ────────────────────────────────────────────

/// Adapter backed by NetworkManager's `nmcli`.
#[derive(Debug, Clone)]
pub struct NmcliAdapter {
    program: String,
}

impl Default for NmcliAdapter {
    fn default() -> Self {
        Self {
            program: "nmcli".into(),
        }
    }
}

impl NmcliAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the binary path (tests, unusual installs).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, CoreError> {
        debug!(program = %self.program, ?args, "running adapter command");
        Ok(Command::new(&self.program).args(args).output().await?)
    }
}

#[async_trait]
impl WirelessAdapter for NmcliAdapter {
    async fn interfaces(&self) -> Result<Vec<InterfaceInfo>, CoreError> {
        let output = self
            .run(&["-t", "-f", "DEVICE,TYPE", "device", "status"])
            .await?;
        if !output.status.success() {
            return Err(CoreError::AdapterUnavailable {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter_map(|line| {
                let (device, rest) = line.split_once(':')?;
                let kind = rest.split(':').next()?;
                (kind == "wifi").then(|| InterfaceInfo {
                    name: device.to_owned(),
                })
            })
            .collect())
    }

    async fn trigger_scan(&self, interface: &str) -> Result<(), CoreError> {
        let output = self
            .run(&["device", "wifi", "rescan", "ifname", interface])
            .await?;
        if !output.status.success() {
            // NetworkManager throttles rescans; a refusal still leaves
            // recent results readable, so the cycle continues.
            debug!(
                interface,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "rescan refused"
            );
        }
        Ok(())
    }

    async fn scan_results(&self, interface: &str) -> Result<Vec<RawNetwork>, CoreError> {
        let output = self
            .run(&[
                "-t",
                "--escape",
                "yes",
                "-f",
                "SSID,BSSID,FREQ,SIGNAL,SECURITY",
                "device",
                "wifi",
                "list",
                "ifname",
                interface,
                "--rescan",
                "no",
            ])
            .await?;
        if !output.status.success() {
            return Err(CoreError::AdapterUnavailable {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(parse_wifi_list(&output.stdout))
    }
}

// ── Terse output parsing ────────────────────────────────────────────

/// Parse `nmcli -t --escape yes` wifi list output.
///
/// Lines that don't carry the expected five fields are skipped with a
/// warning rather than failing the whole scan.
fn parse_wifi_list(stdout: &[u8]) -> Vec<RawNetwork> {
    stdout
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let network = parse_wifi_line(line);
            if network.is_none() {
                warn!(line = %String::from_utf8_lossy(line), "skipping unparseable scan line");
            }
            network
        })
        .collect()
}

fn parse_wifi_line(line: &[u8]) -> Option<RawNetwork> {
    let fields = split_escaped(line);
    if fields.len() != 5 {
        return None;
    }

    let ssid = fields[0].clone();
    let bssid = String::from_utf8_lossy(&fields[1]).into_owned();
    let freq_text = String::from_utf8_lossy(&fields[2]).into_owned();
    let frequency_mhz: u32 = freq_text.split_whitespace().next()?.parse().ok()?;
    let quality: i32 = String::from_utf8_lossy(&fields[3]).trim().parse().ok()?;
    let security = String::from_utf8_lossy(&fields[4]).into_owned();

    Some(RawNetwork {
        ssid,
        bssid,
        frequency_mhz,
        signal_dbm: quality_to_dbm(quality),
        akm: security_to_akm(&security),
    })
}

/// Split a terse line on unescaped `:`, honoring `\:` and `\\`.
fn split_escaped(line: &[u8]) -> Vec<Vec<u8>> {
    let mut fields = Vec::new();
    let mut current = Vec::new();
    let mut iter = line.iter().copied();

    while let Some(b) = iter.next() {
        match b {
            b'\\' => {
                if let Some(escaped) = iter.next() {
                    current.push(escaped);
                }
            }
            b':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(b),
        }
    }
    fields.push(current);
    fields
}

/// Convert nmcli's 0–100 signal quality to an approximate dBm value.
///
/// The model operates on dBm; NetworkManager reports quality only, so
/// we apply the conventional `pct / 2 − 100` mapping (100 → −50 dBm,
/// 0 → −100 dBm).
fn quality_to_dbm(quality: i32) -> i32 {
    quality.clamp(0, 100) / 2 - 100
}

/// Map an nmcli SECURITY flag string to AKM type codes.
///
/// An open network reports no flags, which is the "none" AKM type;
/// flags we don't recognize (e.g. WEP) yield an empty list, which the
/// classifier treats as unknown.
fn security_to_akm(security: &str) -> Vec<i32> {
    let s = security.trim();
    if s.is_empty() || s == "--" {
        return vec![AKM_TYPE_NONE];
    }

    let enterprise = s.contains("802.1X");
    if s.contains("WPA2") && s.contains("WPA3") {
        vec![AKM_TYPE_MIXED]
    } else if s.contains("WPA3") {
        if enterprise {
            vec![AKM_TYPE_WPA3_ENTERPRISE]
        } else if s.contains("SAE") {
            vec![AKM_TYPE_WPA3_SAE]
        } else {
            vec![AKM_TYPE_WPA3]
        }
    } else if s.contains("WPA2") {
        if enterprise {
            vec![AKM_TYPE_WPA2]
        } else {
            vec![AKM_TYPE_WPA2_PSK]
        }
    } else if s.contains("WPA1") || s.contains("WPA") {
        if enterprise {
            vec![AKM_TYPE_WPA]
        } else {
            vec![AKM_TYPE_WPA_PSK]
        }
    } else {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn split_escaped_handles_bssid_colons() {
        let fields = split_escaped(b"MyNet:AA\\:BB\\:CC\\:DD\\:EE\\:FF:2412 MHz:82:WPA2");
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], b"MyNet");
        assert_eq!(fields[1], b"AA:BB:CC:DD:EE:FF");
        assert_eq!(fields[2], b"2412 MHz");
    }

    #[test]
    fn split_escaped_handles_escaped_backslash() {
        let fields = split_escaped(b"a\\\\b:c");
        assert_eq!(fields[0], b"a\\b");
        assert_eq!(fields[1], b"c");
    }

    #[test]
    fn parses_a_full_line() {
        let net =
            parse_wifi_line(b"Cafe 5G:AA\\:BB\\:CC\\:DD\\:EE\\:FF:5180 MHz:67:WPA2").unwrap();
        assert_eq!(net.ssid, b"Cafe 5G");
        assert_eq!(net.bssid, "AA:BB:CC:DD:EE:FF");
        assert_eq!(net.frequency_mhz, 5180);
        assert_eq!(net.signal_dbm, -67); // 67 / 2 - 100
        assert_eq!(net.akm, vec![AKM_TYPE_WPA2_PSK]);
    }

    #[test]
    fn skips_malformed_lines() {
        let nets = parse_wifi_list(b"garbage line\nNet:AA\\:BB\\:CC\\:DD\\:EE\\:FF:2412 MHz:50:\n");
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].akm, vec![AKM_TYPE_NONE]);
    }

    #[test]
    fn quality_conversion_bounds() {
        assert_eq!(quality_to_dbm(100), -50);
        assert_eq!(quality_to_dbm(0), -100);
        assert_eq!(quality_to_dbm(250), -50); // clamped
    }

    #[test]
    fn security_flag_mapping() {
        assert_eq!(security_to_akm(""), vec![AKM_TYPE_NONE]);
        assert_eq!(security_to_akm("--"), vec![AKM_TYPE_NONE]);
        assert_eq!(security_to_akm("WPA2"), vec![AKM_TYPE_WPA2_PSK]);
        assert_eq!(security_to_akm("WPA2 802.1X"), vec![AKM_TYPE_WPA2]);
        assert_eq!(security_to_akm("WPA1"), vec![AKM_TYPE_WPA_PSK]);
        assert_eq!(security_to_akm("WPA3"), vec![AKM_TYPE_WPA3]);
        assert_eq!(security_to_akm("WPA3 SAE"), vec![AKM_TYPE_WPA3_SAE]);
        assert_eq!(security_to_akm("WPA3 802.1X"), vec![AKM_TYPE_WPA3_ENTERPRISE]);
        assert_eq!(security_to_akm("WPA2 WPA3"), vec![AKM_TYPE_MIXED]);
        assert_eq!(security_to_akm("WEP"), Vec::<i32>::new());
    }
}
