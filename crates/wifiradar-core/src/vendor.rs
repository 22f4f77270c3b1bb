//! Vendor identity from BSSID OUI prefixes.

use std::collections::HashMap;

use tracing::{debug, warn};
use url::Url;

use wifiradar_api::OuiClient;

/// Fallback identity when the OUI prefix is unknown or the table could
/// not be fetched.
const FALLBACK_VENDOR: &str = "Mobile";

/// Resolves BSSIDs to a manufacturer make/model pair.
///
/// The registry table is fetched once at startup; resolution itself is
/// synchronous and infallible. An empty table simply resolves
/// everything to the fallback.
#[derive(Debug, Clone, Default)]
pub struct VendorResolver {
    table: HashMap<String, String>,
}

impl VendorResolver {
    /// Build from a pre-assembled assignment table (tests, offline use).
    pub fn from_table(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    /// Fetch the IEEE registry and build the resolver.
    ///
    /// A failed fetch logs and yields an empty resolver rather than
    /// blocking startup.
    pub async fn fetch(oui_url: Url, timeout: std::time::Duration) -> Self {
        match OuiClient::new(oui_url, timeout) {
            Ok(client) => match client.fetch_table().await {
                Ok(table) => {
                    debug!(entries = table.len(), "loaded OUI vendor table");
                    Self { table }
                }
                Err(e) => {
                    warn!(error = %e, "OUI table fetch failed, vendor names degrade to fallback");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "OUI client build failed, vendor names degrade to fallback");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a BSSID to `(make, model)`.
    ///
    /// The model is synthesized from the make; the registry carries no
    /// per-device data.
    pub fn resolve(&self, bssid: &str) -> (String, String) {
        match normalize_oui(bssid).and_then(|oui| self.table.get(&oui)) {
            Some(org) => (org.clone(), format!("Model of {org}")),
            None => (FALLBACK_VENDOR.to_owned(), FALLBACK_VENDOR.to_owned()),
        }
    }
}

/// Extract the six-hex-digit OUI prefix from a BSSID, uppercased, with
/// `:` and `-` separators dropped.
fn normalize_oui(bssid: &str) -> Option<String> {
    let digits: String = bssid
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .take(6)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(digits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> VendorResolver {
        VendorResolver::from_table(HashMap::from([
            ("00000C".to_owned(), "Cisco Systems, Inc".to_owned()),
            ("F02F74".to_owned(), "ASUSTek COMPUTER INC.".to_owned()),
        ]))
    }

    #[test]
    fn resolves_known_prefix() {
        let (make, model) = resolver().resolve("00:00:0C:11:22:33");
        assert_eq!(make, "Cisco Systems, Inc");
        assert_eq!(model, "Model of Cisco Systems, Inc");
    }

    #[test]
    fn resolve_is_case_and_separator_insensitive() {
        let r = resolver();
        assert_eq!(r.resolve("f0:2f:74:aa:bb:cc").0, "ASUSTek COMPUTER INC.");
        assert_eq!(r.resolve("F0-2F-74-AA-BB-CC").0, "ASUSTek COMPUTER INC.");
    }

    #[test]
    fn unknown_prefix_falls_back_to_mobile() {
        let (make, model) = resolver().resolve("DE:AD:BE:EF:00:01");
        assert_eq!(make, "Mobile");
        assert_eq!(model, "Mobile");
    }

    #[test]
    fn malformed_bssid_falls_back_to_mobile() {
        assert_eq!(resolver().resolve("not a bssid").0, "Mobile");
        assert_eq!(resolver().resolve("").0, "Mobile");
    }

    #[test]
    fn empty_resolver_always_falls_back() {
        let r = VendorResolver::default();
        assert!(r.is_empty());
        assert_eq!(r.resolve("00:00:0C:11:22:33").0, "Mobile");
    }
}
