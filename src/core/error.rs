use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Reasoning error: {0}")]
    Reasoning(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Missing parameter '{name}' for action '{action}'")]
    MissingParameter { action: String, name: &'static str },

    #[error("Invalid parameter for action '{action}': {reason}")]
    InvalidParameter { action: String, reason: String },

    #[error("UI target not found: {0}")]
    TargetNotFound(String),

    #[error("Input injection failed: {0}")]
    Input(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Failed to launch '{target}': {reason}")]
    Launch { target: String, reason: String },

    #[error("Chain nesting exceeds {0} levels")]
    ChainTooDeep(usize),

    #[error("Chain aborted at step {index} ({action})")]
    ChainAborted { index: usize, action: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl AgentError {
    /// Failures that are an expected outcome of a plan (logged as warnings)
    /// rather than faults inside a handler.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AgentError::UnknownAction(_)
                | AgentError::MissingParameter { .. }
                | AgentError::InvalidParameter { .. }
                | AgentError::TargetNotFound(_)
                | AgentError::ChainAborted { .. }
                | AgentError::ChainTooDeep(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
