use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::http::{endpoint, Fetch};
use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

/// zenquotes.io answers with a one-element array; tolerate a bare object too.
fn first_quote(doc: &Value) -> (String, String) {
    let entry = match doc {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    let field = |key: &str, fallback: &str| {
        entry
            .and_then(|e| e.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    (field("q", "No quote available"), field("a", "Unknown"))
}

async fn random_quote(fetcher: &dyn Fetch, base: &Url) -> Result<(String, String), ToolError> {
    let url = endpoint(base, &["api", "random"], &[]);
    let doc = fetcher.get_json(url).await?;
    Ok(first_quote(&doc))
}

/// Random inspirational quote.
pub struct RandomQuoteTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl RandomQuoteTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for RandomQuoteTool {
    fn name(&self) -> &str {
        "GetRandomQuote"
    }

    fn description(&self) -> &str {
        "Get a random inspirational quote."
    }

    fn group(&self) -> &str {
        "Quotes"
    }

    async fn invoke(&self, _args: &ToolArgs) -> Result<Value, ToolError> {
        let (quote, author) = random_quote(self.fetcher.as_ref(), &self.base).await?;
        Ok(json!({ "quote": quote, "author": author }))
    }
}

/// Quote "about" a topic. The free quote API has no tag search, so this
/// returns a random quote and reports that the tag was not applied.
pub struct QuoteByTagTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl QuoteByTagTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for QuoteByTagTool {
    fn name(&self) -> &str {
        "GetQuoteByTag"
    }

    fn description(&self) -> &str {
        "Get a quote for a topic such as motivation, success or wisdom. \
         The topic is a hint only; the quote may not match it."
    }

    fn group(&self) -> &str {
        "Quotes"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string("tag", "Topic, e.g. 'motivation', 'success', 'wisdom'")]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let tag = args.str("tag")?;
        let (quote, author) = random_quote(self.fetcher.as_ref(), &self.base).await?;
        Ok(json!({
            "quote": quote,
            "author": author,
            "tag": tag,
            "tag_applied": false,
        }))
    }
}
