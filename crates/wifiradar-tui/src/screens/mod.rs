//! Screen implementations. Each implements the [`Screen`] trait.

mod detail;
mod networks;
mod radar;

pub use detail::DetailScreen;
pub use networks::NetworksScreen;
pub use radar::RadarScreen;

use wifiradar_core::RadarProjector;

use crate::screen::{Screen, ScreenId};

/// Create all three screens in tab order.
pub fn create_screens(projector: RadarProjector) -> Vec<(ScreenId, Box<dyn Screen>)> {
    vec![
        (ScreenId::Networks, Box::new(NetworksScreen::new()) as Box<dyn Screen>),
        (ScreenId::Radar, Box::new(RadarScreen::new(projector))),
        (ScreenId::Detail, Box::new(DetailScreen::new(projector))),
    ]
}
