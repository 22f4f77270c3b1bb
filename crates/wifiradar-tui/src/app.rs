//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use wifiradar_core::{EnvironmentalSample, Monitor, SamplingState};

use crate::action::Action;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::{Screen, ScreenId};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    /// Sampling backend. Cloned into the data bridge task at startup.
    monitor: Monitor,
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screens, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Screen>>,
    /// Whether the app should keep running.
    running: bool,
    /// Last sampling state reported by the monitor.
    sampling_state: SamplingState,
    /// Last environmental sample, for the status bar.
    environment: Option<EnvironmentalSample>,
    /// USB adapter name if one was detected at startup.
    usb_adapter: Option<String>,
    /// Help overlay visibility.
    help_visible: bool,
    /// Terminal size for responsive layout.
    terminal_size: (u16, u16),
    /// Geolocation request channel into the data bridge.
    locate_tx: Option<mpsc::UnboundedSender<String>>,
    /// Action sender — screens can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Screen>> =
            create_screens(monitor.projector()).into_iter().collect();

        Self {
            monitor,
            active_screen: ScreenId::Networks,
            previous_screen: None,
            screens,
            running: true,
            sampling_state: SamplingState::Idle,
            environment: None,
            usb_adapter: None,
            help_visible: false,
            terminal_size: (0, 0),
            locate_tx: None,
            action_tx,
            action_rx,
        }
    }

    /// Initialize all screens with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        // Focus the initial screen
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        let (locate_tx, locate_rx) = mpsc::unbounded_channel();
        self.locate_tx = Some(locate_tx);

        let bridge_cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.monitor.clone(),
            self.action_tx.clone(),
            locate_rx,
            bridge_cancel.clone(),
        ));

        let mut events = EventReader::new();

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        // The bridge stops the monitor on its way out.
        let _ = bridge.await;
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Help
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            // Esc — context-dependent back
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        // Delegate to the active screen
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action — update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    // Unfocus current screen
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    // Focus new screen
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::SamplingChanged(state) => {
                self.sampling_state = state.clone();
            }

            Action::EnvironmentUpdated(sample) => {
                self.environment = sample.clone();
            }

            Action::UsbAdapterDetected(name) => {
                self.usb_adapter = name.clone();
            }

            Action::RequestLocate(bssid) => {
                if let Some(tx) = &self.locate_tx {
                    let _ = tx.send(bssid.clone());
                }
            }

            // Opening a detail view informs the detail screen and jumps to it.
            Action::OpenDetail(_) => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Detail) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
                self.action_tx.send(Action::SwitchScreen(ScreenId::Detail))?;
            }

            // Data and timing actions reach every screen so inactive
            // screens stay current for the next switch.
            Action::SnapshotUpdated(_)
            | Action::GeoResolved { .. }
            | Action::Tick
            | Action::Render => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content_area = layout[0];
        let tab_area = layout[1];
        let status_area = layout[2];

        // Render active screen
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Render help overlay on top (if visible)
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar showing all screens.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar: sampling state, weather, key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let sampling_indicator = match &self.sampling_state {
            SamplingState::Sampling => {
                Span::styled("● sampling", Style::default().fg(theme::SUCCESS_GREEN))
            }
            SamplingState::Idle => {
                Span::styled("○ idle", Style::default().fg(theme::BORDER_GRAY))
            }
            SamplingState::Degraded { reason } => Span::styled(
                format!("◐ degraded: {reason}"),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ),
        };

        let weather = self.environment.as_ref().map_or_else(
            || Span::styled(" │ weather: —", theme::key_hint()),
            |env| {
                Span::styled(
                    format!(
                        " │ {:.1}°C {:.0}% {:.1} kph",
                        env.temperature_c, env.humidity_pct, env.wind_kph
                    ),
                    Style::default().fg(theme::NEON_CYAN),
                )
            },
        );

        let adapter = self.usb_adapter.as_ref().map_or_else(
            || Span::raw(""),
            |name| Span::styled(format!(" │ usb: {name}"), theme::key_hint()),
        );

        let hints = Span::styled(" │ ? help  q quit", theme::key_hint());

        let line = Line::from(vec![
            Span::raw(" "),
            sampling_indicator,
            weather,
            adapter,
            hints,
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 18u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Navigation",
                Style::default().fg(theme::NEON_CYAN),
            )),
            Line::from(Span::styled("  ─────────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  1-3       ", theme::key_hint_key()),
                Span::styled("Jump to screen", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Tab       ", theme::key_hint_key()),
                Span::styled("Next screen", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  j/k ↑/↓   ", theme::key_hint_key()),
                Span::styled("Move up/down", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Enter     ", theme::key_hint_key()),
                Span::styled("Open access-point detail", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Esc       ", theme::key_hint_key()),
                Span::styled("Back / close", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  g/G       ", theme::key_hint_key()),
                Span::styled("Top / bottom", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+d/u  ", theme::key_hint_key()),
                Span::styled("Page down / up", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Global",
                Style::default().fg(theme::NEON_CYAN),
            )),
            Line::from(Span::styled("  ──────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  ?         ", theme::key_hint_key()),
                Span::styled("This help            ", theme::key_hint()),
                Span::styled("q  ", theme::key_hint_key()),
                Span::styled("Quit", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "                       Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
