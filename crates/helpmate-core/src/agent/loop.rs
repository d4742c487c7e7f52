use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::model::{ChatModel, ChatRequest, ModelReply};
use super::transcript::ChatTurn;
use crate::tools::{ToolDescriptor, ToolRegistry};

pub const DEFAULT_MAX_ROUNDS: usize = 8;

const DEFAULT_PREAMBLE: &str = "You are Helpmate, a friendly personal assistant. \
You can look up real weather, exchange rates, world clocks, quotes, jokes and \
Wikipedia summaries, do money calculations, and manage the user's task list. \
Use the available tools whenever they can answer a question with real data, \
then reply concisely in Markdown. If a tool fails, tell the user plainly.";

const EMPTY_REPLY: &str = "I've completed processing but have no response to give.";

/// Find the largest byte index <= `max` that is a UTF-8 char boundary.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut i = max;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn preview(s: &str) -> String {
    if s.len() > 200 {
        let end = floor_char_boundary(s, 200);
        format!("{}... ({} chars)", &s[..end], s.chars().count())
    } else {
        s.to_string()
    }
}

/// Failures that abort a request. Tool failures never end up here; they are
/// fed back to the model as data.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("model still requesting tools after {0} rounds")]
    RoundLimit(usize),
    #[error("language model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Final answer for one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub text: String,
    pub tools_used: Vec<String>,
    pub rounds: usize,
}

/// Drives the model <> tool loop for a single message.
///
/// Each call to [`respond`](Self::respond) starts a fresh transcript; nothing
/// carries over between requests. Tool calls within a round run one after
/// another in the order the model listed them.
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRegistry>,
    descriptors: Vec<ToolDescriptor>,
    preamble: String,
    max_rounds: usize,
    temperature: f64,
    max_tokens: u64,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolRegistry>) -> Self {
        let descriptors = tools.list();
        Self {
            model,
            tools,
            descriptors,
            preamble: DEFAULT_PREAMBLE.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Cap on model calls per request. Values below 1 are raised to 1.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f64, max_tokens: u64) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Answer one user message, running whatever tools the model asks for.
    pub async fn respond(&self, message: &str) -> Result<Reply, OrchestratorError> {
        let mut transcript = vec![ChatTurn::user(message)];
        let mut tools_used = Vec::new();

        for round in 1..=self.max_rounds {
            let request = ChatRequest {
                preamble: &self.preamble,
                transcript: &transcript,
                tools: &self.descriptors,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let started = Instant::now();
            let reply = self.model.complete(request).await.map_err(|e| {
                warn!("LLM call failed in round {round}: {e:#}");
                OrchestratorError::ModelUnavailable(e.to_string())
            })?;
            let elapsed = started.elapsed().as_secs_f64();

            let (text, calls) = match reply {
                ModelReply::Text(text) => {
                    debug!(
                        "LLM response [{round}/{}]: text ({} chars) in {elapsed:.1}s",
                        self.max_rounds,
                        text.len()
                    );
                    let text = if text.trim().is_empty() {
                        EMPTY_REPLY.to_string()
                    } else {
                        text
                    };
                    return Ok(Reply {
                        text,
                        tools_used,
                        rounds: round,
                    });
                }
                ModelReply::ToolCalls { text, calls } => (text, calls),
            };

            debug!(
                "LLM response [{round}/{}]: {} tool call(s) in {elapsed:.1}s",
                self.max_rounds,
                calls.len()
            );
            transcript.push(ChatTurn::Assistant {
                content: text,
                tool_calls: calls.clone(),
            });

            for call in calls {
                info!(
                    "Tool call [{round}/{}]: {}({})",
                    self.max_rounds,
                    call.tool_name,
                    preview(&call.arguments.to_string())
                );
                let result = self
                    .tools
                    .dispatch(&call.tool_name, call.arguments.clone())
                    .await;
                tools_used.push(call.tool_name.clone());
                let turn = ChatTurn::Tool {
                    request: call,
                    result,
                };
                debug!(
                    "Tool result [{}]: {}",
                    tools_used[tools_used.len() - 1],
                    preview(&turn.content())
                );
                transcript.push(turn);
            }
        }

        warn!(
            "Agent loop reached max rounds ({}) without final response",
            self.max_rounds
        );
        Err(OrchestratorError::RoundLimit(self.max_rounds))
    }
}
