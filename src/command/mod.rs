//! Command execution pipeline
//!
//! Converts a natural-language command into desktop actions:
//! command -> IntentResolver -> ActionPlan -> ActionDispatcher (-> ChainExecutor) -> bool

pub mod chain;
pub mod dispatcher;
pub mod pipeline;
pub mod resolver;

pub use chain::{ChainExecutor, StepRunner};
pub use dispatcher::ActionDispatcher;
pub use pipeline::{CommandOutcome, CommandPipeline, OutcomeStatus};
pub use resolver::{IntentResolver, TierStatus};
