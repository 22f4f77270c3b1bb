//! Networks screen — live access-point table.
//!
//! One row per visible access point, colored by raw signal strength.
//! Rows refresh in place as snapshots arrive; selection is keyed by
//! table index and clamped when the population shrinks.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use wifiradar_core::ScanSnapshot;

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::signal_bars::{distance_label, signal_span};

pub struct NetworksScreen {
    focused: bool,
    snapshot: Option<Arc<ScanSnapshot>>,
    table_state: TableState,
}

impl NetworksScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: None,
            table_state: TableState::default(),
        }
    }

    fn row_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.len())
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let count = self.row_count();
        let clamped = if count == 0 { 0 } else { idx.min(count - 1) };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_sign_loss)]
        let next = (current + delta).clamp(0, count as isize - 1) as usize;
        self.select(next);
    }
}

impl Screen for NetworksScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                let count = self.row_count();
                if count > 0 {
                    self.select(count - 1);
                }
                Ok(None)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10);
                Ok(None)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10);
                Ok(None)
            }
            KeyCode::Enter => {
                let bssid = self
                    .snapshot
                    .as_ref()
                    .and_then(|s| s.access_points.get(self.selected_index()))
                    .map(|ap| ap.bssid.clone());
                Ok(bssid.map(Action::OpenDetail))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = Some(Arc::clone(snapshot));
            let count = self.row_count();
            if count > 0 && self.selected_index() >= count {
                self.select(count - 1);
            }
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let count = self.row_count();
        let captured = self
            .snapshot
            .as_ref()
            .map_or_else(String::new, |s| {
                format!("  ·  {}", s.captured_at.format("%H:%M:%S"))
            });
        let title = format!(" Access Points ({count}){captured} ");
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
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("SSID").style(theme::table_header()),
            Cell::from("BSSID").style(theme::table_header()),
            Cell::from("GHz").style(theme::table_header()),
            Cell::from("Signal").style(theme::table_header()),
            Cell::from("Corrected").style(theme::table_header()),
            Cell::from("Distance").style(theme::table_header()),
            Cell::from("Security").style(theme::table_header()),
            Cell::from("Vendor").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let empty = Vec::new();
        let access_points = self
            .snapshot
            .as_ref()
            .map_or(&empty, |s| &s.access_points);

        let rows: Vec<Row> = access_points
            .iter()
            .enumerate()
            .map(|(i, ap)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };

                let ssid = if ap.ssid.is_empty() {
                    "<hidden>".to_owned()
                } else {
                    ap.ssid.clone()
                };

                let signal_cell = Line::from(vec![
                    signal_span(ap.signal_dbm),
                    Span::raw(format!(" {:>4}", ap.signal_dbm)),
                ]);

                let row_style = if is_selected {
                    theme::table_selected()
                } else {
                    theme::signal_style(ap.signal_dbm)
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{ssid}")),
                    Cell::from(ap.bssid.clone()),
                    Cell::from(format!("{:.3}", ap.frequency_ghz)),
                    Cell::from(signal_cell),
                    Cell::from(format!("{:.1}", ap.affected_signal_dbm)),
                    Cell::from(distance_label(ap.distance_m)),
                    Cell::from(ap.security.to_string()),
                    Cell::from(ap.vendor_make.clone()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Min(12),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("detail  ", theme::key_hint()),
            Span::styled("2 ", theme::key_hint_key()),
            Span::styled("radar", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
