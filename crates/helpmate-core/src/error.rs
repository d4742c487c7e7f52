use std::time::Duration;

use thiserror::Error;

/// Failure raised while resolving or running a tool.
///
/// These never escape the [`ToolRegistry`](crate::tools::ToolRegistry):
/// dispatch turns them into failed
/// [`ToolInvocationResult`](crate::tools::ToolInvocationResult)s so the model
/// can explain the problem to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    Validation(String),

    #[error("{service} did not respond within {timeout:?}")]
    UpstreamTimeout { service: String, timeout: Duration },

    #[error("{service} is unavailable: {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    NotFound(String),
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable tag for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::UpstreamTimeout { .. } => "upstream_timeout",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UnknownTool(_) => "unknown_tool",
            Self::NotFound(_) => "not_found",
        }
    }
}
