use thiserror::Error;

use crate::clients::ClientError;
use crate::infra::config::ConfigError;

/// Per-invocation failures. All of them reach the caller as ordinary text
/// content; `UnknownTool` is raised before any client call is made.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),
    #[error("argument '{name}' must be {expected}")]
    InvalidArgument {
        name: &'static str,
        expected: String,
    },
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("could not resolve glossary '{fqn}': {reason}")]
    ResolutionFailed { fqn: String, reason: String },
    #[error(transparent)]
    RemoteFailure(#[from] ClientError),
}

impl DispatchError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::MissingArgument(_) => "missing_argument",
            DispatchError::InvalidArgument { .. } => "invalid_argument",
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::ResolutionFailed { .. } => "resolution_failed",
            DispatchError::RemoteFailure(_) => "remote_failure",
        }
    }
}

/// Errors that abort the process before any session starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("invalid transport '{0}': expected one of: stdio, sse")]
    InvalidTransport(String),
    #[error("failed to build metadata client: {0}")]
    Client(#[from] ClientError),
}
