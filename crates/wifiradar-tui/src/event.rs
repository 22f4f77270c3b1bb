//! Input and pacing events.
//!
//! One background task multiplexes crossterm input with the two clocks
//! the UI runs on: the scan-paced tick (dot reprojection, table
//! refresh) and the frame tick (radar sweep). Mouse input is ignored —
//! every interaction is key-driven.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Cadence of [`Event::Tick`], matched to the sampling cycle.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Cadence of [`Event::Render`] (~30 FPS). Sets the sweep smoothness;
/// together with the radar screen's frames-per-turn constant it fixes
/// the revolution time.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Scan-paced tick.
    Tick,
    /// Frame tick for the sweep animation.
    Render,
}

/// Reads terminal events in a background task and sends them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the background reader with the fixed tick/frame cadence.
    /// Needs a running tokio runtime, so no `Default`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut ticks = tokio::time::interval(TICK_INTERVAL);
            let mut frames = tokio::time::interval(FRAME_INTERVAL);

            // A stalled terminal must not be repaid with a burst of
            // ticks or frames once it catches up.
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,

                    _ = ticks.tick() => Event::Tick,

                    _ = frames.tick() => Event::Render,

                    Some(Ok(terminal_event)) = input.next() => {
                        match terminal_event {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                            // Key release/repeat, mouse, focus, paste.
                            _ => continue,
                        }
                    }
                };

                // If the receiver is dropped, stop.
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Receive the next event. Returns `None` if the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal the background reader to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
