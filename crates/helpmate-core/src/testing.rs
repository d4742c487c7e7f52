//! Test doubles for the network and model seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::agent::{ChatModel, ChatRequest, ChatTurn, ModelReply};
use crate::error::ToolError;
use crate::tools::http::Fetch;

type Responder = Box<dyn Fn(&Url) -> Result<Value, ToolError> + Send + Sync>;

/// [`Fetch`] that answers from a closure and records every URL requested.
pub struct StubFetcher {
    respond: Responder,
    requests: Mutex<Vec<Url>>,
}

impl StubFetcher {
    pub fn new(
        respond: impl Fn(&Url) -> Result<Value, ToolError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json(body: Value) -> Arc<Self> {
        Self::new(move |_| Ok(body.clone()))
    }

    pub fn failing(err: ToolError) -> Arc<Self> {
        Self::new(move |_| Err(err.clone()))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn get_json(&self, url: Url) -> Result<Value, ToolError> {
        self.requests.lock().unwrap().push(url.clone());
        (self.respond)(&url)
    }
}

/// [`ChatModel`] that plays back queued replies and keeps a copy of every
/// transcript it was shown.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<anyhow::Result<ModelReply>>>,
    repeat: Option<ModelReply>,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ModelReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            repeat: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Model that gives the same reply forever.
    pub fn repeating(reply: ModelReply) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: Some(reply),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Model whose first call fails.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(anyhow::anyhow!(message.to_string()))])),
            repeat: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn transcripts(&self) -> Vec<Vec<ChatTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest<'_>) -> anyhow::Result<ModelReply> {
        self.seen.lock().unwrap().push(request.transcript.to_vec());
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            return next;
        }
        match &self.repeat {
            Some(reply) => Ok(reply.clone()),
            None => anyhow::bail!("scripted model ran out of replies"),
        }
    }
}
