//! Ports (interfaces) for the application layer
//!
//! These traits define the boundaries between the application layer
//! and external adapters (infrastructure).

pub mod external_call;
pub mod invocation_logger;
pub mod tool_handler;
