//! HTTP adapter for external dependencies (requires the `remote` feature)

mod client;

pub use client::HttpExternalCall;
