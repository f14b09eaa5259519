//! Terminal input pump for the pharmabill TUI

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Events delivered to the app loop
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Read terminal events on a dedicated thread and forward them to `tx`.
/// The thread stops once the receiving side is dropped.
pub fn spawn_input_reader(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    error!("Terminal poll failed: {}", e);
                    break;
                }
            }
            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
                Ok(Event::Resize(w, h)) => tx.send(AppEvent::Resize(w, h)),
                Ok(_) => Ok(()),
                Err(e) => {
                    error!("Terminal read failed: {}", e);
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
        debug!("Input reader stopped");
    })
}
