//! Screens: the identifier enum and the trait each screen implements.

use std::fmt;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Identifies each primary TUI screen, navigable by number keys 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Networks, // 1
    Radar,  // 2
    Detail, // 3
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Networks, Self::Radar, Self::Detail];

    /// Numeric key (1-3) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Networks => 1,
            Self::Radar => 2,
            Self::Detail => 3,
        }
    }

    /// Screen from a numeric key (1-3). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Networks),
            2 => Some(Self::Radar),
            3 => Some(Self::Detail),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Networks => "Networks",
            Self::Radar => "Radar",
            Self::Detail => "Detail",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Behavior shared by the three screens.
///
/// Screens mutate state only through [`Action`]s: keys on the focused
/// screen may produce one, and data actions (snapshots, geolocation
/// results, ticks) are broadcast to every screen by the app loop so an
/// inactive screen is current the moment it is switched to.
pub trait Screen: Send {
    /// Called once at startup with the action sender, before the first
    /// render.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a key that no global binding claimed. Only the active
    /// screen sees keys.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Absorb a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Told by the app loop when this screen gains or loses the
    /// active-tab slot (screens restyle their borders on it).
    fn set_focused(&mut self, _focused: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Networks.next(), ScreenId::Radar);
        assert_eq!(ScreenId::Detail.next(), ScreenId::Networks);
        assert_eq!(ScreenId::Networks.prev(), ScreenId::Detail);
    }
}
