//! Deployment error taxonomy.
//!
//! Four caller-visible failure classes: validation (reported before any
//! network traffic), network transport, remote provider rejection, and
//! client-side poll timeout. Only the orchestrator converts these into the
//! flat `DeploymentResult` shape.

use crate::archive::ArchiveError;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Bad input caught before any request is issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-2xx status or an `error` deploy
    /// state. The message is the provider's own wording when available.
    #[error("provider error: {0}")]
    Remote(String),

    /// The poll budget ran out without observing a terminal deploy state.
    #[error("deploy did not reach a terminal state after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Message shown to end users, with the per-class hint attached.
    pub fn user_message(&self) -> String {
        match self {
            DeployError::Network(msg) => {
                format!("{} - check your network connectivity and try again", msg)
            }
            DeployError::Timeout { .. } => format!(
                "{} - check the provider dashboard for the final status",
                self
            ),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for DeployError {
    fn from(err: reqwest::Error) -> Self {
        DeployError::Network(err.to_string())
    }
}
