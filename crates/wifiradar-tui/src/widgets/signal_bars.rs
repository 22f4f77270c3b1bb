//! WiFi signal strength bars — ▂▄▆█ with color thresholds.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Returns a styled `Span` with signal bars based on dBm value.
///
/// | Bars    | dBm Range  | Color           |
/// |---------|------------|-----------------|
/// | `▂▄▆█` | >= -50     | Success Green   |
/// | `▂▄▆ ` | -50 to -60 | Neon Cyan       |
/// | `▂▄  ` | -60 to -70 | Electric Yellow |
/// | `▂   ` | -70 to -80 | Coral           |
/// | `·   ` | < -80      | Error Red       |
pub fn signal_span(dbm: i32) -> Span<'static> {
    let (bars, color) = if dbm >= -50 {
        ("▂▄▆█", theme::SUCCESS_GREEN)
    } else if dbm >= -60 {
        ("▂▄▆ ", theme::NEON_CYAN)
    } else if dbm >= -70 {
        ("▂▄  ", theme::ELECTRIC_YELLOW)
    } else if dbm >= -80 {
        ("▂   ", theme::CORAL)
    } else {
        ("·   ", theme::ERROR_RED)
    };

    Span::styled(bars.to_string(), Style::default().fg(color))
}

/// Human-readable distance: meters below 1 km, otherwise kilometers.
pub fn distance_label(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.1} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_switches_units_at_a_kilometer() {
        assert_eq!(distance_label(3.16), "3.2 m");
        assert_eq!(distance_label(999.9), "999.9 m");
        assert_eq!(distance_label(1234.5), "1.23 km");
    }

    #[test]
    fn bars_scale_with_strength() {
        assert_eq!(signal_span(-42).content, "▂▄▆█");
        assert_eq!(signal_span(-65).content, "▂▄  ");
        assert_eq!(signal_span(-85).content, "·   ");
    }
}
