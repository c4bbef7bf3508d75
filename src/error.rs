use std::path::PathBuf;

use thiserror::Error;

use crate::llm::ModelFamily;

/// Failures of a single backend call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{family} is not configured: set `{setting}`")]
    MissingCredential {
        family: ModelFamily,
        setting: &'static str,
    },

    #[error("Failed to communicate with {family}: {detail}")]
    TransportFailure { family: ModelFamily, detail: String },

    #[error("No response content from {family}: {detail}")]
    EmptyResponse { family: ModelFamily, detail: String },
}

/// Everything a command can fail with. Each variant ends up as a single
/// line on stderr.
#[derive(Error, Debug)]
pub enum GitAiError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Malformed response from model: {0}")]
    MalformedResponse(String),

    #[error("No changes detected in git.")]
    NoChanges,

    #[error("No git workspace found at {0}")]
    NoWorkspace(PathBuf),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

pub type Result<T> = std::result::Result<T, GitAiError>;
