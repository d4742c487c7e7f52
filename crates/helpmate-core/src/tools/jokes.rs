use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::http::{endpoint, malformed, pointer_str, Fetch};
use super::{Tool, ToolArgs};
use crate::error::ToolError;

fn joke_payload(joke: &Value, url: &Url) -> Result<Value, ToolError> {
    Ok(json!({
        "setup": pointer_str(joke, "/setup", url)?,
        "punchline": pointer_str(joke, "/punchline", url)?,
        "type": joke.get("type").and_then(Value::as_str).unwrap_or("general"),
    }))
}

/// Random joke from the official joke API.
pub struct RandomJokeTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl RandomJokeTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for RandomJokeTool {
    fn name(&self) -> &str {
        "GetRandomJoke"
    }

    fn description(&self) -> &str {
        "Get a random joke with a setup and punchline."
    }

    fn group(&self) -> &str {
        "Jokes"
    }

    async fn invoke(&self, _args: &ToolArgs) -> Result<Value, ToolError> {
        let url = endpoint(&self.base, &["random_joke"], &[]);
        let doc = self.fetcher.get_json(url.clone()).await?;
        joke_payload(&doc, &url)
    }
}

pub struct ProgrammingJokeTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl ProgrammingJokeTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for ProgrammingJokeTool {
    fn name(&self) -> &str {
        "GetProgrammingJoke"
    }

    fn description(&self) -> &str {
        "Get a random programming joke."
    }

    fn group(&self) -> &str {
        "Jokes"
    }

    async fn invoke(&self, _args: &ToolArgs) -> Result<Value, ToolError> {
        let url = endpoint(&self.base, &["jokes", "programming", "random"], &[]);
        let doc = self.fetcher.get_json(url.clone()).await?;
        // this endpoint wraps the joke in a list
        let joke = doc
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| malformed(&url, "/0"))?;
        joke_payload(joke, &url)
    }
}
