//! deskpilot - natural-language desktop control

pub mod command;
pub mod core;
pub mod desktop;
pub mod llm;
pub mod platform;
pub mod server;
