//! Outbound JSON fetching shared by the API-backed tools.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ToolError;

const USER_AGENT: &str = concat!("helpmate/", env!("CARGO_PKG_VERSION"), " (personal assistant)");

/// Source of JSON documents for the API-backed tools.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_json(&self, url: Url) -> Result<Value, ToolError>;
}

/// [`Fetch`] implementation over a shared reqwest client with a fixed
/// per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, url: &Url, err: reqwest::Error) -> ToolError {
        let service = service_name(url);
        if err.is_timeout() {
            ToolError::UpstreamTimeout {
                service,
                timeout: self.timeout,
            }
        } else if err.is_decode() {
            ToolError::unavailable(service, format!("unreadable response: {err}"))
        } else {
            ToolError::unavailable(service, err.without_url().to_string())
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_json(&self, url: Url) -> Result<Value, ToolError> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ToolError::NotFound(format!(
                "{} has no entry for this request",
                service_name(&url)
            )));
        }
        if !status.is_success() {
            return Err(ToolError::unavailable(
                service_name(&url),
                format!("HTTP {status}"),
            ));
        }

        resp.json::<Value>().await.map_err(|e| self.classify(&url, e))
    }
}

fn service_name(url: &Url) -> String {
    url.host_str().unwrap_or("remote service").to_string()
}

/// Parse a configured base URL, rejecting ones that cannot take path segments.
pub fn base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid endpoint URL '{raw}'"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("endpoint URL '{raw}' cannot be used as a base");
    }
    Ok(url)
}

/// Append percent-encoded path segments and query pairs to `base`.
pub fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

/// Error for a provider response that lacks an expected field.
pub(crate) fn malformed(url: &Url, pointer: &str) -> ToolError {
    ToolError::unavailable(
        service_name(url),
        format!("unexpected response shape (missing '{pointer}')"),
    )
}

/// String at a JSON pointer.
pub(crate) fn pointer_str<'a>(doc: &'a Value, pointer: &str, url: &Url) -> Result<&'a str, ToolError> {
    doc.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(url, pointer))
}

/// Number at a JSON pointer. Providers such as wttr.in encode numbers as
/// strings, so numeric strings are accepted and converted.
pub(crate) fn pointer_number(doc: &Value, pointer: &str, url: &Url) -> Result<Value, ToolError> {
    match doc.pointer(pointer) {
        Some(Value::Number(n)) => Ok(Value::Number(n.clone())),
        Some(Value::String(s)) => parse_number(s).ok_or_else(|| malformed(url, pointer)),
        _ => Err(malformed(url, pointer)),
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
