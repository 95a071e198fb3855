//! Reasoning tier abstraction

use crate::core::error::Result;
use async_trait::async_trait;

/// A language model that turns a prompt pair into raw text
///
/// The resolver asks each tier in order; a tier that is not available is
/// skipped without being asked to complete.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Short label used in logs and status reports
    fn name(&self) -> &str;

    /// Cheap liveness probe, checked before every completion
    async fn is_available(&self) -> bool;

    /// Send a completion request and return the model's raw text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
