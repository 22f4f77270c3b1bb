// One-shot download of the IEEE OUI assignment table (oui.csv layout:
// Registry,Assignment,Organization Name,Organization Address).
//
// Fetched once at process start; the resolver in core keeps the parsed
// map in memory for the lifetime of the process.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::Error;

/// Async client for the remote OUI vendor database.
#[derive(Clone)]
pub struct OuiClient {
    http: reqwest::Client,
    url: Url,
}

impl OuiClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// Wrap an existing `reqwest::Client` (tests, shared pools).
    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Download and parse the vendor table.
    ///
    /// Keys are uppercase 6-hex-digit assignment prefixes (no
    /// separators), values are organization names.
    pub async fn fetch_table(&self) -> Result<HashMap<String, String>, Error> {
        debug!("GET {}", self.url);

        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                endpoint: "oui.csv",
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(parse_oui_csv(&body))
    }
}

/// Parse the CSV body into prefix → organization.
///
/// The organization field may be quoted and contain commas; later
/// columns (addresses) are ignored.
fn parse_oui_csv(body: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();

    for line in body.lines().skip(1) {
        let fields = split_csv_fields(line);
        let (Some(assignment), Some(org)) = (fields.get(1), fields.get(2)) else {
            continue;
        };
        let prefix: String = assignment
            .chars()
            .filter(char::is_ascii_hexdigit)
            .collect::<String>()
            .to_ascii_uppercase();
        if prefix.len() == 6 && !org.is_empty() {
            table.insert(prefix, org.trim().to_owned());
        }
    }

    table
}

/// Minimal RFC 4180 field splitter — enough for the OUI table.
fn split_csv_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside a quoted field
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
