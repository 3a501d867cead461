//! Worker-side half of the GUI: owns the async runtime and the webhook client.

pub mod commands;
pub mod runtime;
