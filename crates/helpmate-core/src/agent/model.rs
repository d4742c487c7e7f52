use anyhow::Result;
use async_trait::async_trait;
#[allow(deprecated)]
use rig::client::completion::CompletionModelHandle;
use rig::completion::{CompletionModel, CompletionRequest, Message, ToolDefinition};
use rig::message::{AssistantContent, Text, ToolResult, ToolResultContent, UserContent};
use rig::OneOrMany;
use tracing::debug;

use super::transcript::ChatTurn;
use crate::tools::{ToolDescriptor, ToolInvocationRequest};

/// Everything the model needs for one completion call.
pub struct ChatRequest<'a> {
    pub preamble: &'a str,
    pub transcript: &'a [ChatTurn],
    pub tools: &'a [ToolDescriptor],
    pub temperature: f64,
    pub max_tokens: u64,
}

/// What the model answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Final natural-language answer.
    Text(String),
    /// One or more tool requests, with any text the model emitted alongside.
    ToolCalls {
        text: String,
        calls: Vec<ToolInvocationRequest>,
    },
}

impl ModelReply {
    pub fn from_parts(text: String, calls: Vec<ToolInvocationRequest>) -> Self {
        if calls.is_empty() {
            ModelReply::Text(text)
        } else {
            ModelReply::ToolCalls { text, calls }
        }
    }
}

/// A chat-completion service with function calling, where the model itself
/// decides which tools (if any) to request.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ModelReply>;
}

/// [`ChatModel`] backed by any rig completion provider.
#[allow(deprecated)]
pub struct RigChatModel {
    model: CompletionModelHandle<'static>,
    name: String,
}

#[allow(deprecated)]
impl RigChatModel {
    pub fn new(model: CompletionModelHandle<'static>, name: impl Into<String>) -> Self {
        Self {
            model,
            name: name.into(),
        }
    }
}

#[allow(deprecated)]
#[async_trait]
impl ChatModel for RigChatModel {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ModelReply> {
        let chat_history = OneOrMany::many(to_rig_messages(request.transcript))
            .map_err(|_| anyhow::anyhow!("cannot send an empty transcript"))?;

        // tool_choice stays unset: providers default to automatic selection
        let completion = CompletionRequest {
            preamble: Some(request.preamble.to_string()),
            chat_history,
            documents: Vec::new(),
            tools: tool_definitions(request.tools),
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
            tool_choice: None,
            additional_params: None,
        };

        debug!(
            "LLM request to {}: {} turns, {} tools",
            self.name,
            request.transcript.len(),
            request.tools.len()
        );
        let response = self
            .model
            .completion(completion)
            .await
            .map_err(|e| anyhow::anyhow!("LLM completion error: {e}"))?;

        Ok(from_rig_choice(response.choice.iter()))
    }
}

fn tool_definitions(tools: &[ToolDescriptor]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|t| ToolDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            parameters: t.parameters_schema(),
        })
        .collect()
}

fn text_content(text: &str) -> UserContent {
    UserContent::Text(Text {
        text: text.to_string(),
    })
}

/// Convert a transcript to rig messages. Consecutive tool turns are grouped
/// into a single user message of tool results, as providers expect.
fn to_rig_messages(transcript: &[ChatTurn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(transcript.len());
    let mut pending_results: Vec<UserContent> = Vec::new();

    let flush = |pending: &mut Vec<UserContent>, messages: &mut Vec<Message>| {
        if let Ok(content) = OneOrMany::many(std::mem::take(pending)) {
            messages.push(Message::User { content });
        }
    };

    for turn in transcript {
        match turn {
            ChatTurn::Tool { request, .. } => {
                pending_results.push(UserContent::ToolResult(ToolResult {
                    id: request.id.clone(),
                    call_id: request.call_id.clone(),
                    content: OneOrMany::one(ToolResultContent::Text(Text {
                        text: turn.content(),
                    })),
                }));
            }
            ChatTurn::User { content } => {
                flush(&mut pending_results, &mut messages);
                messages.push(Message::User {
                    content: OneOrMany::one(text_content(content)),
                });
            }
            ChatTurn::Assistant {
                content,
                tool_calls,
            } => {
                flush(&mut pending_results, &mut messages);
                let mut parts: Vec<AssistantContent> = Vec::new();
                if !content.is_empty() {
                    parts.push(AssistantContent::Text(Text {
                        text: content.clone(),
                    }));
                }
                for call in tool_calls {
                    parts.push(match &call.call_id {
                        Some(call_id) => AssistantContent::tool_call_with_call_id(
                            call.id.clone(),
                            call_id.clone(),
                            call.tool_name.clone(),
                            call.arguments.clone(),
                        ),
                        None => AssistantContent::tool_call(
                            call.id.clone(),
                            call.tool_name.clone(),
                            call.arguments.clone(),
                        ),
                    });
                }
                let content = OneOrMany::many(parts).unwrap_or_else(|_| {
                    OneOrMany::one(AssistantContent::Text(Text {
                        text: String::new(),
                    }))
                });
                messages.push(Message::Assistant { id: None, content });
            }
        }
    }
    flush(&mut pending_results, &mut messages);
    messages
}

fn from_rig_choice<'a>(choice: impl Iterator<Item = &'a AssistantContent>) -> ModelReply {
    let mut text = String::new();
    let mut calls = Vec::new();
    for content in choice {
        match content {
            AssistantContent::Text(t) => text.push_str(&t.text),
            AssistantContent::ToolCall(tc) => calls.push(ToolInvocationRequest {
                id: tc.id.clone(),
                call_id: tc.call_id.clone(),
                tool_name: tc.function.name.clone(),
                arguments: tc.function.arguments.clone(),
            }),
            AssistantContent::Reasoning(r) => {
                debug!("Model reasoning: {}", r.reasoning.join(" "));
            }
            _ => {}
        }
    }
    ModelReply::from_parts(text, calls)
}
