use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::http::{endpoint, Fetch};
use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

const MAX_SUMMARY_CHARS: usize = 500;
const NO_SUMMARY: &str = "No summary available.";

/// Cut `text` to at most `max` characters, appending "..." when shortened.
fn clip(text: &str, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((end, _)) => (format!("{}...", &text[..end]), true),
        None => (text.to_string(), false),
    }
}

/// Article summary via the Wikipedia REST API.
pub struct WikipediaSummaryTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl WikipediaSummaryTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for WikipediaSummaryTool {
    fn name(&self) -> &str {
        "GetWikipediaSummary"
    }

    fn description(&self) -> &str {
        "Get a short Wikipedia summary of a topic, person, place or thing."
    }

    fn group(&self) -> &str {
        "Wikipedia"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string("topic", "Article title to look up, e.g. 'Eiffel Tower'")]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let topic = args.str("topic")?;
        let title = topic.split_whitespace().collect::<Vec<_>>().join("_");
        let url = endpoint(&self.base, &["api", "rest_v1", "page", "summary", title.as_str()], &[]);
        let doc = self.fetcher.get_json(url).await.map_err(|e| match e {
            ToolError::NotFound(_) => ToolError::NotFound(format!("no Wikipedia article for '{topic}'")),
            other => other,
        })?;

        let extract = doc
            .get("extract")
            .and_then(Value::as_str)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(NO_SUMMARY);
        let (summary, truncated) = clip(extract, MAX_SUMMARY_CHARS);
        let page = doc
            .pointer("/content_urls/desktop/page")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(json!({
            "title": doc.get("title").and_then(Value::as_str).unwrap_or(topic),
            "summary": summary,
            "truncated": truncated,
            "url": page,
        }))
    }
}
