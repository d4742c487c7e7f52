use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use url::Url;

use super::http::{endpoint, malformed, pointer_str, Fetch};
use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

const DEFAULT_TARGETS: &str = "EUR,GBP,JPY,INR,AUD,CAD";

/// Normalize an ISO 4217 code: three ASCII letters, upper-cased.
fn currency_code(raw: &str, param: &str) -> Result<String, ToolError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ToolError::validation(format!(
            "{param} must be a 3-letter currency code (e.g. USD), got '{raw}'"
        )))
    }
}

/// Currency conversion via frankfurter.app.
pub struct ConvertCurrencyTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl ConvertCurrencyTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for ConvertCurrencyTool {
    fn name(&self) -> &str {
        "ConvertCurrency"
    }

    fn description(&self) -> &str {
        "Convert an amount between currencies using live exchange rates."
    }

    fn group(&self) -> &str {
        "Currency"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("amount", "Amount to convert").minimum(0.0),
            ParamSpec::string("from_currency", "Source currency code (e.g. USD, EUR, GBP, JPY)"),
            ParamSpec::string("to_currency", "Target currency code"),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let amount = args.f64("amount")?;
        if amount <= 0.0 {
            return Err(ToolError::validation("amount must be greater than zero"));
        }
        let from = currency_code(args.str("from_currency")?, "from_currency")?;
        let to = currency_code(args.str("to_currency")?, "to_currency")?;

        // The provider rejects identical codes; the answer is trivial anyway.
        if from == to {
            return Ok(json!({
                "amount": amount,
                "from": from,
                "to": to,
                "converted": amount,
                "rate": 1.0,
                "date": Value::Null,
            }));
        }

        let amount_str = amount.to_string();
        let url = endpoint(
            &self.base,
            &["latest"],
            &[("amount", &amount_str), ("from", &from), ("to", &to)],
        );
        let doc = self.fetcher.get_json(url.clone()).await?;

        let pointer = format!("/rates/{to}");
        let converted = doc
            .pointer(&pointer)
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed(&url, &pointer))?;
        let date = pointer_str(&doc, "/date", &url)?;

        Ok(json!({
            "amount": amount,
            "from": from,
            "to": to,
            "converted": converted,
            "rate": converted / amount,
            "date": date,
        }))
    }
}

/// One-to-many rate listing via frankfurter.app.
pub struct ExchangeRatesTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl ExchangeRatesTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for ExchangeRatesTool {
    fn name(&self) -> &str {
        "GetExchangeRates"
    }

    fn description(&self) -> &str {
        "Get current exchange rates from one base currency to several others."
    }

    fn group(&self) -> &str {
        "Currency"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("base_currency", "Base currency code (e.g. USD, EUR)"),
            ParamSpec::string("target_currencies", "Comma-separated target currency codes")
                .default_value(json!(DEFAULT_TARGETS)),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let base = currency_code(args.str("base_currency")?, "base_currency")?;
        let targets = args
            .opt_str("target_currencies")
            .unwrap_or(DEFAULT_TARGETS)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| currency_code(s, "target_currencies"))
            .collect::<Result<Vec<_>, _>>()?;
        if targets.is_empty() {
            return Err(ToolError::validation("target_currencies lists no currency codes"));
        }

        let to = targets.join(",");
        let url = endpoint(&self.base, &["latest"], &[("from", &base), ("to", &to)]);
        let doc = self.fetcher.get_json(url.clone()).await?;

        let rates = doc
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(&url, "/rates"))?;
        let mut normalized = Map::new();
        for (code, rate) in rates {
            let rate = rate.as_f64().ok_or_else(|| malformed(&url, &format!("/rates/{code}")))?;
            normalized.insert(code.clone(), json!(rate));
        }

        Ok(json!({
            "base": base,
            "date": pointer_str(&doc, "/date", &url)?,
            "rates": normalized,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;
    use crate::tools::http::base_url;

    /// Fake frankfurter that converts with a fixed USD/EUR rate table.
    fn fake_frankfurter() -> Arc<StubFetcher> {
        StubFetcher::new(|url: &Url| {
            let query: std::collections::HashMap<String, String> =
                url.query_pairs().into_owned().collect();
            let amount: f64 = query.get("amount").map(|a| a.parse().unwrap()).unwrap_or(1.0);
            let rate = match (query["from"].as_str(), query["to"].as_str()) {
                ("USD", "EUR") => 0.9234,
                ("EUR", "USD") => 1.0 / 0.9234,
                other => panic!("unexpected pair {other:?}"),
            };
            let to = query["to"].clone();
            Ok(json!({
                "amount": amount,
                "base": query["from"],
                "date": "2026-10-16",
                "rates": { to: amount * rate }
            }))
        })
    }

    fn tool(stub: Arc<StubFetcher>) -> ConvertCurrencyTool {
        ConvertCurrencyTool::new(stub, base_url("https://api.frankfurter.app").unwrap())
    }

    async fn convert(tool: &ConvertCurrencyTool, amount: f64, from: &str, to: &str) -> Value {
        let args = ToolArgs::from_value(json!({
            "amount": amount, "from_currency": from, "to_currency": to
        }))
        .unwrap();
        tool.invoke(&args).await.unwrap()
    }

    #[tokio::test]
    async fn conversion_round_trips() {
        let tool = tool(fake_frankfurter());
        for amount in [1.0, 19.99, 250.0, 1_000_000.0] {
            let there = convert(&tool, amount, "usd", "EUR").await;
            let back = convert(&tool, there["converted"].as_f64().unwrap(), "EUR", "USD").await;
            let returned = back["converted"].as_f64().unwrap();
            assert!((returned - amount).abs() < 1e-6 * amount.max(1.0), "{amount} -> {returned}");
        }
    }

    #[tokio::test]
    async fn rate_is_derived_from_converted_amount() {
        let stub = fake_frankfurter();
        let tool = tool(stub.clone());
        let out = convert(&tool, 100.0, "USD", "EUR").await;
        assert_eq!(out["from"], "USD");
        assert!((out["rate"].as_f64().unwrap() - 0.9234).abs() < 1e-9);
        assert_eq!(out["date"], "2026-10-16");
        let url = &stub.requests()[0];
        assert_eq!(url.path(), "/latest");
    }

    #[tokio::test]
    async fn same_currency_needs_no_lookup() {
        let stub = fake_frankfurter();
        let tool = tool(stub.clone());
        let out = convert(&tool, 42.0, "GBP", "gbp").await;
        assert_eq!(out["converted"], 42.0);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn bad_inputs_rejected_before_fetch() {
        let stub = fake_frankfurter();
        let tool = tool(stub.clone());
        for args in [
            json!({"amount": 0, "from_currency": "USD", "to_currency": "EUR"}),
            json!({"amount": 10, "from_currency": "dollars", "to_currency": "EUR"}),
            json!({"amount": 10, "from_currency": "USD", "to_currency": "E1R"}),
        ] {
            let err = tool.invoke(&ToolArgs::from_value(args).unwrap()).await.unwrap_err();
            assert_eq!(err.kind(), "validation");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn rates_listing_uses_default_targets() {
        let stub = StubFetcher::json(json!({
            "amount": 1.0, "base": "USD", "date": "2026-10-16",
            "rates": {"EUR": 0.92, "GBP": 0.79, "JPY": 149.5}
        }));
        let tool = ExchangeRatesTool::new(stub.clone(), base_url("https://api.frankfurter.app").unwrap());
        let args = ToolArgs::from_value(json!({
            "base_currency": "usd",
            "target_currencies": DEFAULT_TARGETS
        }))
        .unwrap();
        let out = tool.invoke(&args).await.unwrap();
        assert_eq!(out["base"], "USD");
        assert_eq!(out["rates"]["JPY"], 149.5);

        let url = &stub.requests()[0];
        let to = url.query_pairs().find(|(k, _)| k == "to").unwrap().1.into_owned();
        assert_eq!(to, DEFAULT_TARGETS);
    }
}
