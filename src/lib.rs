//! Core library behind the `typearena` binary: the typing-session state
//! machine, the scoring/progression engines, match control and JSON
//! persistence. Terminal I/O lives entirely in `main.rs`; everything here is
//! headless and driven by integration tests and benches as well.

pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod event;
pub mod players;
pub mod session;
pub mod store;
