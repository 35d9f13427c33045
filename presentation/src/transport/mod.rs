//! Transports feeding requests into the dispatcher

pub mod stdio;

pub use stdio::{ServeSummary, serve_lines};
