//! Reasoning tiers and plan parsing
//!
//! Language models only turn a command into an ActionPlan; they never touch
//! the desktop themselves.

pub mod backend;
pub mod client;
pub mod local;
pub mod parser;
pub mod prompt;

pub use backend::ReasoningBackend;
pub use client::LlmClient;
pub use local::OllamaClient;
pub use parser::parse_plan;
