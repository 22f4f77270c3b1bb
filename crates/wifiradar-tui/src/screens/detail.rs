//! Detail screen — one access point, in depth.
//!
//! Shows the full derivation for the selected access point (raw and
//! corrected signal, distance, approach time, motion status), a signal
//! history sparkline, and the best-effort geolocation result.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Sparkline};

use wifiradar_core::{
    AccessPointObservation, GeoPoint, RadarProjector, RadarSlot, ScanSnapshot,
};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::signal_bars::{distance_label, signal_span};

/// Signal history samples kept per BSSID (one per snapshot).
const HISTORY_CAP: usize = 120;

/// Outcome of a geolocation request.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GeoState {
    Pending,
    Resolved(Option<GeoPoint>),
}

pub struct DetailScreen {
    focused: bool,
    projector: RadarProjector,
    snapshot: Option<Arc<ScanSnapshot>>,
    selected_bssid: Option<String>,
    geo: HashMap<String, GeoState>,
    history: HashMap<String, VecDeque<i32>>,
}

impl DetailScreen {
    pub fn new(projector: RadarProjector) -> Self {
        Self {
            focused: false,
            projector,
            snapshot: None,
            selected_bssid: None,
            geo: HashMap::new(),
            history: HashMap::new(),
        }
    }

    fn selected_observation(&self) -> Option<&AccessPointObservation> {
        let bssid = self.selected_bssid.as_deref()?;
        self.snapshot
            .as_ref()?
            .access_points
            .iter()
            .find(|ap| ap.bssid == bssid)
    }

    fn selected_slot(&self) -> Option<RadarSlot> {
        let bssid = self.selected_bssid.as_deref()?;
        let snapshot = self.snapshot.as_ref()?;
        self.projector
            .project(snapshot)
            .into_iter()
            .find(|slot| slot.bssid == bssid)
    }

    fn record_history(&mut self, snapshot: &ScanSnapshot) {
        for ap in &snapshot.access_points {
            let series = self.history.entry(ap.bssid.clone()).or_default();
            if series.len() == HISTORY_CAP {
                series.pop_front();
            }
            series.push_back(ap.signal_dbm);
        }
    }

    fn geo_line(&self, bssid: &str) -> Line<'static> {
        let label = Span::styled("  Position       ", Style::default().fg(theme::DIM_WHITE));
        let value = match self.geo.get(bssid) {
            Some(GeoState::Pending) => {
                Span::styled("resolving…", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            Some(GeoState::Resolved(Some(point))) => Span::styled(
                format!("{:.5}, {:.5}", point.latitude, point.longitude),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Some(GeoState::Resolved(None)) => {
                Span::styled("unavailable", Style::default().fg(theme::BORDER_GRAY))
            }
            None => Span::styled("not requested", Style::default().fg(theme::BORDER_GRAY)),
        };
        Line::from(vec![label, value])
    }
}

impl Screen for DetailScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                self.record_history(snapshot);
                self.snapshot = Some(Arc::clone(snapshot));
            }
            Action::OpenDetail(bssid) => {
                self.selected_bssid = Some(bssid.clone());
                // One lookup per BSSID; re-opening does not re-query.
                if !self.geo.contains_key(bssid) {
                    self.geo.insert(bssid.clone(), GeoState::Pending);
                    return Ok(Some(Action::RequestLocate(bssid.clone())));
                }
            }
            Action::GeoResolved { bssid, point } => {
                self.geo.insert(bssid.clone(), GeoState::Resolved(*point));
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ap) = self.selected_observation() else {
            let block = Block::default()
                .title(" Detail ")
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let message = if self.selected_bssid.is_some() {
                "Selected access point is no longer visible."
            } else {
                "No access point selected. Press Enter on the Networks screen."
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(message, theme::table_row())))
                    .centered(),
                inner,
            );
            return;
        };

        let ssid = if ap.ssid.is_empty() { "<hidden>" } else { &ap.ssid };
        let title = format!(" {ssid}  ·  {} ", ap.bssid);
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(10), // facts
            Constraint::Min(4),     // history sparkline
        ])
        .split(inner);

        let slot = self.selected_slot();
        let (motion, approach) = slot.as_ref().map_or_else(
            || ("─".to_owned(), "─".to_owned()),
            |s| {
                (
                    s.motion.to_string(),
                    format!("{:.1} min on foot", s.approach_minutes),
                )
            },
        );

        let dim = Style::default().fg(theme::DIM_WHITE);
        let cyan = Style::default().fg(theme::NEON_CYAN);
        let facts = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Signal         ", dim),
                signal_span(ap.signal_dbm),
                Span::styled(format!(" {} dBm", ap.signal_dbm), theme::signal_style(ap.signal_dbm)),
                Span::styled("     Corrected  ", dim),
                Span::styled(format!("{:.1} dBm", ap.affected_signal_dbm), cyan),
            ]),
            Line::from(vec![
                Span::styled("  Distance       ", dim),
                Span::styled(distance_label(ap.distance_m), cyan),
                Span::styled("     Approach   ", dim),
                Span::styled(approach, cyan),
            ]),
            Line::from(vec![
                Span::styled("  Frequency      ", dim),
                Span::styled(format!("{:.3} GHz", ap.frequency_ghz), cyan),
                Span::styled("     Security   ", dim),
                Span::styled(ap.security.to_string(), cyan),
            ]),
            Line::from(vec![
                Span::styled("  Vendor         ", dim),
                Span::styled(ap.vendor_make.clone(), cyan),
                Span::styled("     Model      ", dim),
                Span::styled(ap.vendor_model.clone(), dim),
            ]),
            Line::from(vec![
                Span::styled("  Motion         ", dim),
                Span::styled(motion, cyan),
            ]),
            self.geo_line(&ap.bssid),
        ];
        frame.render_widget(Paragraph::new(facts), layout[0]);

        // Signal history, offset so stronger readings draw taller bars.
        let series: Vec<u64> = self
            .history
            .get(&ap.bssid)
            .map(|h| {
                h.iter()
                    .map(|dbm| u64::from((dbm + 100).clamp(0, 100).unsigned_abs()))
                    .collect()
            })
            .unwrap_or_default();

        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .title(" Signal history ")
                    .title_style(theme::title_style())
                    .borders(Borders::TOP)
                    .border_style(theme::border_default()),
            )
            .style(Style::default().fg(theme::signal_color(ap.signal_dbm)))
            .max(100)
            .data(&series);
        frame.render_widget(sparkline, layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
