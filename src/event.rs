//! Event plumbing between a running session and whatever renders it.
//!
//! The session pushes state-change events synchronously from `process_input`;
//! the `Ticker` adds periodic `Tick`s from a background thread so elapsed
//! time keeps moving between keystrokes. The session stops its ticker on
//! `init` and on completion, and `Ticker::stop` joins the thread, so no tick
//! is produced after a turn has been torn down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::session::stats::{FinalStats, LiveStats};

#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// Fresh stats snapshot after an accepted input event.
    Live(LiveStats),
    /// The most recently typed character does not match the target.
    InputError,
    /// The turn is over; final stats are fixed. Sent at most once.
    Completed(FinalStats),
    /// Periodic heartbeat while the session is active.
    Tick,
}

/// Repeating tick source with explicit start/stop.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(interval: Duration, tx: Sender<SessionEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                if tx.send(SessionEvent::Tick).is_err() {
                    break;
                }
                thread::sleep(interval);
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
