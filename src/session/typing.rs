//! One player's attempt at one target text.
//!
//! The session consumes whole input-buffer snapshots (not deltas): every
//! keystroke hands in the full text typed so far, and correctness counts are
//! recomputed from scratch against the target. Finishing the text always
//! completes the turn; wrong characters only cost accuracy.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::event::{SessionEvent, Ticker};
use crate::session::stats::{self, FinalStats, LiveStats};

/// Whether deleting already-typed characters is allowed mid-turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackspaceMode {
    #[default]
    Allowed,
    Disabled,
}

impl BackspaceMode {
    /// Resolves an opaque config key; anything unknown means no restriction.
    pub fn from_key(key: &str) -> Self {
        match key {
            "disabled" => BackspaceMode::Disabled,
            _ => BackspaceMode::Allowed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackspaceMode::Allowed => "allowed",
            BackspaceMode::Disabled => "disabled",
        }
    }
}

/// How a single position in the target text should be displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect,
    /// The cursor position: next character to type.
    Current,
    Untyped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharState {
    pub ch: char,
    pub status: CharStatus,
}

const DEFAULT_TICK: Duration = Duration::from_millis(100);

pub struct TypingSession {
    target: Vec<char>,
    typed: Vec<char>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    is_active: bool,
    correct_chars: usize,
    incorrect_chars: usize,
    // Last accepted input length; a shorter input means backspace/delete.
    previous_input_len: usize,
    backspace_mode: BackspaceMode,
    events: Option<Sender<SessionEvent>>,
    ticker: Option<Ticker>,
    tick_interval: Duration,
}

impl TypingSession {
    pub fn new() -> Self {
        Self {
            target: Vec::new(),
            typed: Vec::new(),
            started_at: None,
            finished_at: None,
            is_active: false,
            correct_chars: 0,
            incorrect_chars: 0,
            previous_input_len: 0,
            backspace_mode: BackspaceMode::default(),
            events: None,
            ticker: None,
            tick_interval: DEFAULT_TICK,
        }
    }

    /// Arms the session with a new target and clears every per-turn field.
    /// Backspace mode and subscribers survive; a running ticker does not.
    pub fn init(&mut self, text: &str) {
        self.stop_ticker();
        self.target = text.chars().collect();
        self.typed = Vec::new();
        self.started_at = None;
        self.finished_at = None;
        self.is_active = false;
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        self.previous_input_len = 0;
    }

    /// Re-arms the current target.
    pub fn reset(&mut self) {
        let text: String = self.target.iter().collect();
        self.init(&text);
    }

    /// Registers the single subscriber for live/error/completion events.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.events = Some(tx);
        rx
    }

    /// Policy for subsequent inputs; text already typed is untouched.
    pub fn set_backspace_mode(&mut self, mode: BackspaceMode) {
        self.backspace_mode = mode;
    }

    pub fn backspace_mode(&self) -> BackspaceMode {
        self.backspace_mode
    }

    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }

    /// Ingests the full input buffer as typed so far and returns the text
    /// the caller's buffer must hold afterwards. The two differ only when a
    /// shrinking edit is rejected under `BackspaceMode::Disabled`; the
    /// caller is expected to force its buffer back to the returned value.
    pub fn process_input(&mut self, input: &str) -> String {
        let input_chars: Vec<char> = input.chars().collect();

        // First non-empty input activates the session and starts the ticker.
        if self.started_at.is_none() && !input_chars.is_empty() {
            self.start();
        }

        if !self.is_active {
            return input.to_string();
        }

        if self.backspace_mode == BackspaceMode::Disabled
            && input_chars.len() < self.previous_input_len
        {
            return self.typed.iter().collect();
        }

        self.previous_input_len = input_chars.len();
        self.typed = input_chars;
        self.recount();

        // Error side-channel: the character just typed does not match.
        if let Some(idx) = self.typed.len().checked_sub(1)
            && self.target.get(idx) != Some(&self.typed[idx])
        {
            self.emit(SessionEvent::InputError);
        }

        self.emit(SessionEvent::Live(self.stats()));

        if self.typed.len() >= self.target.len() {
            self.complete();
        }

        input.to_string()
    }

    /// Ends the turn: freezes the clock, stops the ticker, publishes final
    /// stats. Later calls are no-ops, as is any further `process_input`.
    pub fn complete(&mut self) {
        if self.finished_at.is_some() {
            return;
        }
        self.is_active = false;
        self.finished_at = Some(Instant::now());
        self.stop_ticker();
        let final_stats = self.final_stats();
        self.emit(SessionEvent::Completed(final_stats));
    }

    /// Live snapshot; elapsed time keeps running until completion.
    pub fn stats(&self) -> LiveStats {
        let elapsed = self
            .started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        let elapsed_secs = elapsed as u64;
        LiveStats {
            wpm: stats::words_per_minute(self.correct_chars, elapsed).round() as u32,
            accuracy: stats::accuracy_percent(self.correct_chars, self.incorrect_chars).round()
                as u32,
            progress: stats::progress_percent(self.typed.len(), self.target.len()),
            elapsed_secs,
            formatted_time: stats::format_time(elapsed_secs),
            current_index: self.typed.len(),
            total_chars: self.target.len(),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars,
        }
    }

    /// Result over the fixed start/end interval. Meaningful once completed.
    pub fn final_stats(&self) -> FinalStats {
        let elapsed = match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            _ => 0.0,
        };
        let time_seconds = elapsed.round() as u32;
        FinalStats {
            wpm: stats::words_per_minute(self.correct_chars, elapsed).round() as u32,
            accuracy: stats::accuracy_percent(self.correct_chars, self.incorrect_chars).round()
                as u32,
            time_seconds,
            formatted_time: stats::format_time(time_seconds as u64),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars,
            total_chars: self.target.len(),
            words_typed: self.words_in_target(),
        }
    }

    /// Per-position classification of the whole target, for rendering.
    /// Derived on demand; never mutates.
    pub fn character_states(&self) -> Vec<CharState> {
        self.target
            .iter()
            .enumerate()
            .map(|(idx, &ch)| {
                let status = match self.typed.get(idx) {
                    Some(&typed) if typed == ch => CharStatus::Correct,
                    Some(_) => CharStatus::Incorrect,
                    None if idx == self.typed.len() => CharStatus::Current,
                    None => CharStatus::Untyped,
                };
                CharState { ch, status }
            })
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.typed.len()
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn incorrect_chars(&self) -> usize {
        self.incorrect_chars
    }

    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    fn start(&mut self) {
        self.is_active = true;
        self.started_at = Some(Instant::now());
        if let Some(tx) = &self.events {
            self.ticker = Some(Ticker::spawn(self.tick_interval, tx.clone()));
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    // Full recount over the overlap of typed and target. Characters typed
    // past the end of the target count as neither, keeping the invariant
    // correct + incorrect == min(typed, target).
    fn recount(&mut self) {
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        for (idx, ch) in self.typed.iter().enumerate() {
            match self.target.get(idx) {
                Some(expected) if expected == ch => self.correct_chars += 1,
                Some(_) => self.incorrect_chars += 1,
                None => {}
            }
        }
    }

    fn words_in_target(&self) -> usize {
        self.target
            .iter()
            .collect::<String>()
            .split_whitespace()
            .count()
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

impl Default for TypingSession {
    fn default() -> Self {
        Self::new()
    }
}
