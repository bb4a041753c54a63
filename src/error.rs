use thiserror::Error;

use crate::entity::PromptId;

/// The prompt mutation that was being attempted when a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationAction::Create => write!(f, "create"),
            MutationAction::Update => write!(f, "update"),
            MutationAction::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PromptdeskError {
    #[error("Authentication rejected by backend (HTTP {status})")]
    Auth { status: u16 },

    #[error("Failed to fetch prompts (HTTP {status})")]
    Fetch { status: u16 },

    #[error("Failed to {action} prompt (HTTP {status})")]
    Mutation { action: MutationAction, status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not logged in. Run 'promptdesk login' first.")]
    NotAuthenticated,

    #[error("Already logged in. Run 'promptdesk logout' first.")]
    AlreadyAuthenticated,

    #[error("Cannot {action} while in {state} mode")]
    InvalidState { action: &'static str, state: String },

    #[error("Prompt not found: {0}")]
    PromptNotFound(PromptId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PromptdeskError {
    /// HTTP status carried by backend rejections, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PromptdeskError::Auth { status }
            | PromptdeskError::Fetch { status }
            | PromptdeskError::Mutation { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptdeskError>;
