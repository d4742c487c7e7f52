use serde::Serialize;

use crate::tools::{ToolInvocationRequest, ToolInvocationResult};

/// One turn of a single request's conversation. Transcripts live only for
/// the duration of one [`Orchestrator::respond`](super::Orchestrator::respond)
/// call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatTurn {
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolInvocationRequest>,
    },
    Tool {
        request: ToolInvocationRequest,
        result: ToolInvocationResult,
    },
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        ChatTurn::User {
            content: content.into(),
        }
    }

    /// Text the model sees for this turn.
    pub fn content(&self) -> String {
        match self {
            ChatTurn::User { content } | ChatTurn::Assistant { content, .. } => content.clone(),
            ChatTurn::Tool { result, .. } => result.to_model_text(),
        }
    }
}
