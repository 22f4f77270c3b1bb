//! Radar screen — polar plot of access points around the observer.
//!
//! The dial redraws at the render rate for a smooth sweep, but the dots
//! only re-project every third tick so positions stay readable instead
//! of jittering with every scan cycle.

use std::f64::consts::TAU;
use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use wifiradar_core::{MotionStatus, RadarProjector, RadarSlot, ScanSnapshot};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;

/// Dots re-project every this many ticks (ticks arrive at 1 Hz).
const DOT_REFRESH_TICKS: u64 = 3;

/// Sweep revolution time in render frames (~30 FPS → one turn per 4 s).
const SWEEP_FRAMES_PER_TURN: f64 = 120.0;

pub struct RadarScreen {
    focused: bool,
    projector: RadarProjector,
    /// Latest snapshot, not yet necessarily projected.
    pending: Option<Arc<ScanSnapshot>>,
    /// Slots currently on the dial.
    slots: Vec<RadarSlot>,
    sweep_angle: f64,
    tick_count: u64,
}

impl RadarScreen {
    pub fn new(projector: RadarProjector) -> Self {
        Self {
            focused: false,
            projector,
            pending: None,
            slots: Vec::new(),
            sweep_angle: 0.0,
            tick_count: 0,
        }
    }

    fn reproject(&mut self) {
        if let Some(snapshot) = &self.pending {
            self.slots = self.projector.project(snapshot);
        }
    }

    fn paint_dial(&self, ctx: &mut Context<'_>) {
        // Range rings.
        for radius in [0.25, 0.5, 0.75, 0.95] {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color: theme::RADAR_GREEN,
            });
        }

        // Crosshair.
        ctx.draw(&ratatui::widgets::canvas::Line {
            x1: -0.95,
            y1: 0.0,
            x2: 0.95,
            y2: 0.0,
            color: theme::BG_HIGHLIGHT,
        });
        ctx.draw(&ratatui::widgets::canvas::Line {
            x1: 0.0,
            y1: -0.95,
            x2: 0.0,
            y2: 0.95,
            color: theme::BG_HIGHLIGHT,
        });

        // Sweep beam.
        ctx.draw(&ratatui::widgets::canvas::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.95 * self.sweep_angle.cos(),
            y2: 0.95 * self.sweep_angle.sin(),
            color: theme::SUCCESS_GREEN,
        });

        // Observer.
        ctx.print(
            0.0,
            0.0,
            Span::styled("◉", Style::default().fg(theme::NEON_CYAN)),
        );

        // Access-point dots and labels.
        for slot in &self.slots {
            let (x, y) = slot.position(1.0);
            let color = match slot.motion {
                MotionStatus::Moving => theme::CORAL,
                MotionStatus::Stable => theme::signal_color(slot.signal_dbm),
            };
            ctx.print(x, y, Span::styled("●", Style::default().fg(color)));

            let name: String = if slot.ssid.is_empty() {
                slot.bssid.chars().take(8).collect()
            } else {
                slot.ssid.chars().take(12).collect()
            };
            let label = format!("{name} ({:.0}m)", slot.distance_m);
            ctx.print(
                x + 0.04,
                y + 0.04,
                Span::styled(label, Style::default().fg(theme::DIM_WHITE)),
            );
        }
    }
}

impl Screen for RadarScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                let first = self.pending.is_none();
                self.pending = Some(Arc::clone(snapshot));
                if first {
                    self.reproject();
                }
            }
            Action::Tick => {
                self.tick_count += 1;
                if self.tick_count % DOT_REFRESH_TICKS == 0 {
                    self.reproject();
                }
            }
            Action::Render => {
                self.sweep_angle = (self.sweep_angle + TAU / SWEEP_FRAMES_PER_TURN) % TAU;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let range = self.projector.max_range_m();
        let title = format!(
            " Radar  ·  {} in range  ·  outer ring {range:.0} m ",
            self.slots.len()
        );
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
            Constraint::Min(1),    // dial
            Constraint::Length(1), // legend
        ])
        .split(inner);

        let canvas = Canvas::default()
            .x_bounds([-1.2, 1.2])
            .y_bounds([-1.2, 1.2])
            .paint(|ctx: &mut Context<'_>| self.paint_dial(ctx));
        frame.render_widget(canvas, layout[0]);

        let legend = Line::from(vec![
            Span::styled("  ● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled("strong  ", theme::key_hint()),
            Span::styled("● ", Style::default().fg(theme::ELECTRIC_YELLOW)),
            Span::styled("moderate  ", theme::key_hint()),
            Span::styled("● ", Style::default().fg(theme::ERROR_RED)),
            Span::styled("weak  ", theme::key_hint()),
            Span::styled("● ", Style::default().fg(theme::CORAL)),
            Span::styled("moving  ", theme::key_hint()),
            Span::styled("│ bearings are synthetic", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(legend), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
