//! Canonical domain types.

mod observation;
mod security;

pub use observation::{AccessPointObservation, EnvironmentalSample, ScanSnapshot};
pub use security::SecurityType;
