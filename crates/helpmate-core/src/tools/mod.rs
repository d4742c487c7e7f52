pub mod currency;
pub mod encyclopedia;
pub mod finance;
pub mod http;
pub mod jokes;
pub mod quotes;
pub mod task;
pub mod weather;
pub mod world_time;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use helpmate_config::ToolsConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::task::TaskStore;
use http::{base_url, Fetch};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

/// One declared parameter of a tool. Parameters are required unless marked
/// [`optional`](ParamSpec::optional).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
            allowed: None,
            minimum: None,
            default: None,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamType::String, description)
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamType::Number, description)
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamType::Integer, description)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Optional parameter filled with `value` when the caller omits it.
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }
}

/// Public description of a registered tool, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub group: String,
    pub parameters: Vec<ParamSpec>,
}

impl ToolDescriptor {
    /// Render the parameter list as a JSON-Schema object for function calling.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut prop = serde_json::json!({
                "type": param.kind.as_str(),
                "description": param.description,
            });
            if let Some(allowed) = param.allowed {
                prop["enum"] = serde_json::json!(allowed);
            }
            if let Some(min) = param.minimum {
                prop["minimum"] = serde_json::json!(min);
            }
            if let Some(default) = &param.default {
                prop["default"] = default.clone();
            }
            properties.insert(param.name.to_string(), prop);
            if param.required {
                required.push(param.name);
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Arguments handed to a tool, already validated against its schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(ToolError::validation(format!(
                "expected a JSON object of arguments, got {other}"
            ))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Required string argument, trimmed and non-empty.
    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        match self.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim()),
            Some(Value::String(_)) => Err(ToolError::validation(format!("{name} must not be empty"))),
            Some(_) => Err(ToolError::validation(format!("{name} must be a string"))),
            None => Err(ToolError::validation(format!("missing required parameter: {name}"))),
        }
    }

    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn f64(&self, name: &str) -> Result<f64, ToolError> {
        let value = self
            .get(name)
            .ok_or_else(|| ToolError::validation(format!("missing required parameter: {name}")))?;
        value
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ToolError::validation(format!("{name} must be a finite number")))
    }

    pub fn u64(&self, name: &str) -> Result<u64, ToolError> {
        let value = self
            .get(name)
            .ok_or_else(|| ToolError::validation(format!("missing required parameter: {name}")))?;
        value
            .as_u64()
            .ok_or_else(|| ToolError::validation(format!("{name} must be a non-negative integer")))
    }

    /// Coerce loosely typed model output to the declared parameter shape:
    /// enum strings take the declared spelling when they match ignoring
    /// case, and whole-number floats become integers.
    fn normalize(&mut self, param: &ParamSpec) {
        let Some(value) = self.0.get_mut(param.name) else {
            return;
        };
        let replacement = match (param.kind, &*value) {
            (ParamType::String, Value::String(s)) => param
                .allowed
                .and_then(|allowed| allowed.iter().find(|a| a.eq_ignore_ascii_case(s.trim())))
                .map(|canonical| Value::from(*canonical)),
            (ParamType::Integer, Value::Number(n)) if !n.is_i64() && !n.is_u64() => n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .and_then(|f| {
                    if f >= 0.0 && f <= u64::MAX as f64 {
                        Some(Value::from(f as u64))
                    } else if f >= i64::MIN as f64 {
                        Some(Value::from(f as i64))
                    } else {
                        None
                    }
                }),
            _ => None,
        };
        if let Some(replacement) = replacement {
            *value = replacement;
        }
    }

    fn fill_default(&mut self, name: &str, value: &Value) {
        if self.get(name).is_none() {
            self.0.insert(name.to_string(), value.clone());
        }
    }

    fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Trait for tools callable by the LLM agent.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Capability group shown in the UI listing (e.g. "Weather").
    fn group(&self) -> &str;
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }
    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError>;
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Outcome of one tool call, as fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ToolInvocationResult {
    pub fn ok(tool_name: &str, payload: Value) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            success: true,
            payload: Some(payload),
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure(tool_name: &str, error: &ToolError) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            success: false,
            payload: None,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
        }
    }

    /// JSON text placed in the model's context.
    pub fn to_model_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                "{{\"toolName\":\"{}\",\"success\":false,\"errorMessage\":\"unserializable result: {e}\"}}",
                self.tool_name
            )
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("tool name '{0}' is empty or contains whitespace")]
    InvalidName(String),
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
    #[error("tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },
}

struct RegisteredTool {
    tool: Box<dyn Tool>,
    descriptor: ToolDescriptor,
    schema: Value,
}

/// Registry of available tools, keyed by exact name and kept in
/// registration order.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Names must be unique and free of whitespace, and
    /// parameter names unique within a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        let parameters = tool.parameters();
        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(RegistryError::DuplicateParameter {
                    tool: name,
                    param: param.name.to_string(),
                });
            }
        }

        let descriptor = ToolDescriptor {
            name: name.clone(),
            description: tool.description().to_string(),
            group: tool.group().to_string(),
            parameters,
        };
        let schema = descriptor.parameters_schema();
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            tool,
            descriptor,
            schema,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors of every tool, in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Run the named tool. Never fails: unknown names, bad arguments and
    /// adapter errors all come back as unsuccessful results.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolInvocationResult {
        let Some(&idx) = self.index.get(name) else {
            warn!("Model requested unknown tool '{name}'");
            return ToolInvocationResult::failure(name, &ToolError::UnknownTool(name.to_string()));
        };
        let entry = &self.tools[idx];

        let outcome = match prepare_args(entry, arguments) {
            Ok(args) => entry.tool.invoke(&args).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(payload) => ToolInvocationResult::ok(name, payload),
            Err(e) => {
                debug!("Tool '{name}' failed ({}): {e}", e.kind());
                ToolInvocationResult::failure(name, &e)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn prepare_args(entry: &RegisteredTool, arguments: Value) -> Result<ToolArgs, ToolError> {
    let mut args = ToolArgs::from_value(arguments)?;
    for param in &entry.descriptor.parameters {
        if let Some(default) = &param.default {
            args.fill_default(param.name, default);
        }
        args.normalize(param);
    }
    let errors = validate_params(&args.as_value(), &entry.schema);
    if !errors.is_empty() {
        return Err(ToolError::Validation(errors.join("; ")));
    }
    Ok(args)
}

/// Build the full production tool set.
pub fn default_registry(
    config: &ToolsConfig,
    fetcher: Arc<dyn Fetch>,
    tasks: Arc<Mutex<TaskStore>>,
) -> anyhow::Result<ToolRegistry> {
    let endpoints = &config.endpoints;
    let weather_base = base_url(&endpoints.weather)?;
    let currency_base = base_url(&endpoints.currency)?;
    let time_base = base_url(&endpoints.world_time)?;
    let quotes_base = base_url(&endpoints.quotes)?;
    let jokes_base = base_url(&endpoints.jokes)?;
    let wiki_base = base_url(&endpoints.encyclopedia)?;

    let mut registry = ToolRegistry::new();

    registry.register(Box::new(weather::CurrentWeatherTool::new(
        fetcher.clone(),
        weather_base.clone(),
    )))?;
    registry.register(Box::new(weather::WeatherForecastTool::new(
        fetcher.clone(),
        weather_base,
    )))?;

    registry.register(Box::new(currency::ConvertCurrencyTool::new(
        fetcher.clone(),
        currency_base.clone(),
    )))?;
    registry.register(Box::new(currency::ExchangeRatesTool::new(
        fetcher.clone(),
        currency_base,
    )))?;

    registry.register(Box::new(world_time::WorldTimeTool::new(
        fetcher.clone(),
        time_base,
    )))?;

    registry.register(Box::new(quotes::RandomQuoteTool::new(
        fetcher.clone(),
        quotes_base.clone(),
    )))?;
    registry.register(Box::new(quotes::QuoteByTagTool::new(
        fetcher.clone(),
        quotes_base,
    )))?;

    registry.register(Box::new(jokes::RandomJokeTool::new(
        fetcher.clone(),
        jokes_base.clone(),
    )))?;
    registry.register(Box::new(jokes::ProgrammingJokeTool::new(
        fetcher.clone(),
        jokes_base,
    )))?;

    registry.register(Box::new(encyclopedia::WikipediaSummaryTool::new(
        fetcher, wiki_base,
    )))?;

    registry.register(Box::new(finance::CalculateTipTool))?;
    registry.register(Box::new(finance::SplitBillTool))?;
    registry.register(Box::new(finance::CompoundInterestTool))?;
    registry.register(Box::new(finance::LoanPaymentTool))?;

    registry.register(Box::new(task::GetTasksTool::new(tasks.clone())))?;
    registry.register(Box::new(task::AddTaskTool::new(tasks.clone())))?;
    registry.register(Box::new(task::CompleteTaskTool::new(tasks)))?;

    Ok(registry)
}

/// Validate tool parameters against a JSON schema.
/// Returns a list of validation error strings (empty if valid).
fn validate_params(params: &Value, schema: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    validate_value(params, schema, "", &mut errors);
    errors
}

fn validate_value(val: &Value, schema: &Value, path: &str, errors: &mut Vec<String>) {
    let display_path = if path.is_empty() { "root" } else { path };

    if let Some(expected_type) = schema.get("type").and_then(|t| t.as_str()) {
        let type_ok = match expected_type {
            "object" => val.is_object(),
            "array" => val.is_array(),
            "string" => val.is_string(),
            "integer" => val.is_i64() || val.is_u64(),
            "number" => val.is_number(),
            "boolean" => val.is_boolean(),
            "null" => val.is_null(),
            _ => true,
        };
        if !type_ok {
            errors.push(format!("{display_path}: expected type '{expected_type}'"));
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(|e| e.as_array()) {
        if !allowed.contains(val) {
            let options: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
            errors.push(format!(
                "{display_path}: value not in allowed values [{}]",
                options.join(", ")
            ));
        }
    }

    if let Some(n) = val.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(|m| m.as_f64()) {
            if n < min {
                errors.push(format!("{display_path}: value {n} < minimum {min}"));
            }
        }
    }

    if let Some(obj) = val.as_object() {
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for field in required.iter().filter_map(|r| r.as_str()) {
                if obj.get(field).map_or(true, Value::is_null) {
                    let field_path = if path.is_empty() {
                        field.to_string()
                    } else {
                        format!("{path}.{field}")
                    };
                    errors.push(format!("{field_path}: required field missing"));
                }
            }
        }
        if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
            for (key, prop_schema) in props {
                if let Some(prop_val) = obj.get(key).filter(|v| !v.is_null()) {
                    let prop_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    validate_value(prop_val, prop_schema, &prop_path, errors);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::testing::StubFetcher;

    struct EchoTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "Echo"
        }
        fn description(&self) -> &str {
            "Echo the text back"
        }
        fn group(&self) -> &str {
            "Test"
        }
        fn parameters(&self) -> Vec<ParamSpec> {
            vec![
                ParamSpec::string("text", "Text to echo"),
                ParamSpec::integer("times", "Repeat count")
                    .minimum(1.0)
                    .default_value(json!(1)),
                ParamSpec::string("mode", "Casing").one_of(&["upper", "lower"]).optional(),
            ]
        }
        async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = args.str("text")?;
            let times = args.u64("times")?;
            let echo = match args.opt_str("mode") {
                Some("upper") => text.to_uppercase(),
                Some("lower") => text.to_lowercase(),
                _ => text.to_string(),
            };
            Ok(json!({ "echo": echo.repeat(times as usize) }))
        }
    }

    fn echo_registry() -> (ToolRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(EchoTool {
                calls: calls.clone(),
            }))
            .unwrap();
        (registry, calls)
    }

    #[test]
    fn test_schema_rendering() {
        let (registry, _) = echo_registry();
        let descriptor = &registry.list()[0];
        let schema = descriptor.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["text"]));
        assert_eq!(schema["properties"]["times"]["type"], "integer");
        assert_eq!(schema["properties"]["times"]["default"], 1);
        assert_eq!(schema["properties"]["mode"]["enum"], json!(["upper", "lower"]));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (mut registry, calls) = echo_registry();
        let err = registry.register(Box::new(EchoTool { calls })).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("Echo".into()));
    }

    #[tokio::test]
    async fn test_dispatch_applies_defaults() {
        let (registry, calls) = echo_registry();
        let result = registry.dispatch("Echo", json!({"text": "hi"})).await;
        assert!(result.success);
        assert_eq!(result.payload, Some(json!({"echo": "hi"})));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_tool() {
        let (registry, calls) = echo_registry();
        let result = registry
            .dispatch("Echo", json!({"text": "hi", "times": 0, "mode": "shout"}))
            .await;
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("validation"));
        let message = result.error_message.unwrap();
        assert!(message.contains("minimum"));
        assert!(message.contains("allowed values"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enum_case_and_whole_floats_accepted() {
        let (registry, calls) = echo_registry();
        let result = registry
            .dispatch("Echo", json!({"text": "ab", "times": 2.0, "mode": "UPPER"}))
            .await;
        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(result.payload, Some(json!({"echo": "ABAB"})));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let result = registry.dispatch("Echo", json!({"text": "ab", "times": 2.5})).await;
        assert_eq!(result.error_kind.as_deref(), Some("validation"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let (registry, calls) = echo_registry();
        let result = registry.dispatch("Echo", json!("hi")).await;
        assert_eq!(result.error_kind.as_deref(), Some("validation"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_makes_no_network_call() {
        let stub = StubFetcher::json(json!({}));
        let tasks = Arc::new(Mutex::new(TaskStore::new()));
        let registry = default_registry(&ToolsConfig::default(), stub.clone(), tasks).unwrap();

        let result = registry.dispatch("GetWeather", json!({"city": "Paris"})).await;
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("unknown_tool"));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_name_match_is_exact() {
        let (registry, calls) = echo_registry();
        for name in ["echo", "Ech", "Echo ", "EchoTool"] {
            let result = registry.dispatch(name, json!({"text": "x"})).await;
            assert_eq!(result.error_kind.as_deref(), Some("unknown_tool"), "{name}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_registry_contents() {
        let stub = StubFetcher::json(json!({}));
        let tasks = Arc::new(Mutex::new(TaskStore::new()));
        let registry = default_registry(&ToolsConfig::default(), stub, tasks).unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "GetCurrentWeather",
                "GetWeatherForecast",
                "ConvertCurrency",
                "GetExchangeRates",
                "GetWorldTime",
                "GetRandomQuote",
                "GetQuoteByTag",
                "GetRandomJoke",
                "GetProgrammingJoke",
                "GetWikipediaSummary",
                "CalculateTip",
                "SplitBill",
                "CalculateCompoundInterest",
                "CalculateLoanPayment",
                "GetTasks",
                "AddTask",
                "CompleteTask",
            ]
        );
    }

    #[test]
    fn test_failure_result_serialization() {
        let result = ToolInvocationResult::failure("GetWorldTime", &ToolError::NotFound("no".into()));
        let value: Value = serde_json::from_str(&result.to_model_text()).unwrap();
        assert_eq!(
            value,
            json!({
                "toolName": "GetWorldTime",
                "success": false,
                "errorMessage": "no",
                "errorKind": "not_found"
            })
        );
    }

    #[test]
    fn test_missing_required() {
        let schema = json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"}
            },
            "required": ["query"]
        });
        let errors = validate_params(&json!({}), &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("required field missing"));
    }

    #[test]
    fn test_wrong_type() {
        let schema = json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer"}
            },
            "required": ["count"]
        });
        let errors = validate_params(&json!({"count": "not_a_number"}), &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected type 'integer'"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let schema = json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"}
            },
            "required": ["query"]
        });
        let params = json!({"query": "test", "extra": "ignored"});
        assert!(validate_params(&params, &schema).is_empty());
    }
}
