use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use helpmate_config::{apply_env_overrides, find_config_path, load_config, save_config, Config};
use helpmate_core::tools::default_registry;
use helpmate_core::tools::http::HttpFetcher;
use helpmate_core::{Orchestrator, RigChatModel, TaskStore, ToolRegistry};
use helpmate_server::AppState;
#[allow(deprecated)]
use rig::client::completion::CompletionModelHandle;
use rig::client::{CompletionClient, Nothing};
use rig::providers::{anthropic, deepseek, groq, ollama, openai, openrouter};
use tokio::sync::Mutex;

const PROVIDERS: &str = "anthropic, openai, ollama, openrouter, deepseek, groq";

/// Render markdown text to the terminal using termimad.
fn render_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

#[derive(Parser)]
#[command(name = "helpmate", about = "Personal assistant with live data tools", version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve,
    /// Ask a single question and print the answer
    Ask {
        /// The message to send
        #[arg(short, long)]
        message: String,
    },
    /// List the available tools
    Tools,
    /// Run one tool directly, without the model
    Call {
        /// Tool name, e.g. GetWorldTime
        tool: String,
        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let base_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = format!("{base_filter},helpmate_core=debug");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(find_config_path);

    if let Commands::Init { force } = cli.command {
        return run_init(&config_path, force);
    }

    let mut config = load_config(&config_path)?;
    apply_env_overrides(&mut config)?;

    match cli.command {
        Commands::Serve => {
            let orchestrator = build_orchestrator(&config)?;
            helpmate_server::serve(&config.gateway, AppState::new(Arc::new(orchestrator))).await?;
        }
        Commands::Ask { message } => {
            let orchestrator = build_orchestrator(&config)?;
            let reply = orchestrator.respond(&message).await?;
            render_markdown(&reply.text);
            if !reply.tools_used.is_empty() {
                println!("\n(tools: {})", reply.tools_used.join(", "));
            }
        }
        Commands::Tools => {
            let registry = build_registry(&config)?;
            print_tools(&registry);
        }
        Commands::Call { tool, args } => {
            let registry = build_registry(&config)?;
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let result = registry.dispatch(&tool, arguments).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Status => run_status(&config_path, &config),
        Commands::Init { .. } => unreachable!(),
    }

    Ok(())
}

fn build_registry(config: &Config) -> Result<ToolRegistry> {
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(config.tools.timeout_secs))?);
    let tasks = Arc::new(Mutex::new(TaskStore::new()));
    default_registry(&config.tools, fetcher, tasks)
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let registry = build_registry(config)?;
    let agent = &config.agent;
    let handle = create_model_for(&agent.model.provider, &agent.model.model, config)?;
    let model = RigChatModel::new(handle, agent.model.model.clone());

    let mut orchestrator = Orchestrator::new(Arc::new(model), Arc::new(registry))
        .with_max_rounds(agent.max_tool_rounds as usize)
        .with_sampling(f64::from(agent.temperature), u64::from(agent.max_tokens));
    if let Some(prompt) = agent.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
        orchestrator = orchestrator.with_preamble(prompt);
    }
    tracing::info!(
        "Assistant ready: {} tools, up to {} rounds per message",
        orchestrator.tools().len(),
        orchestrator.max_rounds()
    );
    Ok(orchestrator)
}

fn print_tools(registry: &ToolRegistry) {
    if registry.is_empty() {
        println!("No tools registered.");
        return;
    }
    let mut group = String::new();
    for tool in registry.list() {
        if tool.group != group {
            println!("\n{}", tool.group);
            group = tool.group.clone();
        }
        let params: Vec<String> = tool
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    p.name.to_string()
                } else {
                    format!("{}?", p.name)
                }
            })
            .collect();
        println!("  {}({}) - {}", tool.name, params.join(", "), tool.description);
    }
}

fn run_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    save_config(config_path, &Config::default())?;
    println!("Wrote default config to {}", config_path.display());
    println!("Set agent.model.provider and agent.model.model, then run `helpmate serve`.");
    Ok(())
}

fn run_status(config_path: &Path, config: &Config) {
    println!("helpmate status");
    println!();
    if config_path.exists() {
        println!("  Config:    {} (found)", config_path.display());
    } else {
        println!("  Config:    {} (not found, using defaults)", config_path.display());
    }

    let model = &config.agent.model;
    let or_unset = |s: &str| if s.is_empty() { "(not set)".to_string() } else { s.to_string() };
    println!("  Provider:  {}", or_unset(&model.provider));
    println!("  Model:     {}", or_unset(&model.model));
    if !model.provider.is_empty() {
        let key_state = match api_key_env(&model.provider) {
            Some(env_var) => match resolve_api_key(config.providers.get(&model.provider), env_var) {
                Some(_) => "set".to_string(),
                None => format!("missing (config or {env_var})"),
            },
            None => "not required".to_string(),
        };
        println!("  API key:   {key_state}");
    }
    println!("  Gateway:   http://{}:{}", config.gateway.host, config.gateway.port);
    println!("  Timeout:   {}s per tool call", config.tools.timeout_secs);
    println!("  Rounds:    {} per message", config.agent.max_tool_rounds);
}

fn api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "deepseek" => Some("DEEPSEEK_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        _ => None,
    }
}

/// Resolve an API key from config, falling back to an environment variable.
fn resolve_api_key(
    provider_cfg: Option<&helpmate_config::ProviderConfig>,
    env_var: &str,
) -> Option<String> {
    provider_cfg
        .and_then(|c| c.api_key.clone())
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.is_empty()))
}

fn require_api_key(provider: &str, config: &Config) -> Result<String> {
    let env_var = api_key_env(provider).unwrap_or("API_KEY");
    resolve_api_key(config.providers.get(provider), env_var).ok_or_else(|| {
        anyhow::anyhow!(
            "{provider} provider selected but no API key found. \
             Set providers.{provider}.apiKey in config.json or {env_var} env var."
        )
    })
}

fn api_base<'a>(config: &'a Config, provider: &str) -> Option<&'a str> {
    config
        .providers
        .get(provider)
        .and_then(|c| c.api_base.as_deref())
        .filter(|b| !b.is_empty())
}

/// Create a completion model for a specific provider + model combination.
///
/// Errors clearly if provider is unknown or has no API key.
#[allow(deprecated)]
fn create_model_for(
    provider: &str,
    model_name: &str,
    config: &Config,
) -> Result<CompletionModelHandle<'static>> {
    if provider.is_empty() {
        anyhow::bail!(
            "No provider configured. Set agent.model.provider or HELPMATE_PROVIDER.\n\
             Valid providers: {PROVIDERS}"
        );
    }

    if model_name.is_empty() {
        anyhow::bail!("No model configured for provider '{provider}'.");
    }

    match provider {
        "anthropic" => {
            let key = require_api_key(provider, config)?;
            let client: anthropic::Client = anthropic::Client::builder()
                .api_key(&key)
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to create Anthropic client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using Anthropic provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        "openai" => {
            let key = require_api_key(provider, config)?;
            let mut builder = openai::CompletionsClient::builder().api_key(&key);
            if let Some(base) = api_base(config, provider) {
                builder = builder.base_url(base);
                tracing::info!("Using OpenAI-compatible endpoint: {base}");
            }
            let client: openai::CompletionsClient = builder
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to create OpenAI client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using OpenAI provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        "ollama" => {
            let mut builder = ollama::Client::builder().api_key(Nothing);
            if let Some(base) = api_base(config, provider) {
                builder = builder.base_url(base);
            }
            let client: ollama::Client = builder
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to create Ollama client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using Ollama provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        "openrouter" => {
            let key = require_api_key(provider, config)?;
            let client: openrouter::Client = openrouter::Client::new(&key)
                .map_err(|e| anyhow::anyhow!("Failed to create OpenRouter client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using OpenRouter provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        "deepseek" => {
            let key = require_api_key(provider, config)?;
            let client: deepseek::Client = deepseek::Client::new(&key)
                .map_err(|e| anyhow::anyhow!("Failed to create DeepSeek client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using DeepSeek provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        "groq" => {
            let key = require_api_key(provider, config)?;
            let client: groq::Client = groq::Client::new(&key)
                .map_err(|e| anyhow::anyhow!("Failed to create Groq client: {e}"))?;
            let model = client.completion_model(model_name);
            tracing::info!("Using Groq provider with model '{model_name}'");
            Ok(CompletionModelHandle::new(Arc::new(model)))
        }

        other => {
            anyhow::bail!("Unknown provider '{other}'. Valid providers: {PROVIDERS}");
        }
    }
}
