//! Core types, configuration and errors shared by every layer

pub mod config;
pub mod error;
pub mod types;

pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use types::{ActionKind, ActionPlan};
