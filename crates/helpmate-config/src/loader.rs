use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::Config;

/// Find the config file by searching standard locations.
pub fn find_config_path() -> PathBuf {
    // 1. Current directory
    let local = Path::new("config.json");
    if local.exists() {
        return local.to_path_buf();
    }

    // 2. ~/.helpmate/config.json
    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".helpmate").join("config.json");
        if home_config.exists() {
            return home_config;
        }
    }

    // Default: ~/.helpmate/config.json (will use defaults if missing)
    dirs::home_dir()
        .map(|h| h.join(".helpmate").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Load configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Save configuration to a JSON file.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let contents = serde_json::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create config directory '{}'",
                parent.to_string_lossy()
            )
        })?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config '{}'", path.display()))?;
    Ok(())
}

/// Overlay `HELPMATE_*` environment variables on top of a loaded config.
///
/// Recognised: `HELPMATE_PROVIDER`, `HELPMATE_MODEL`, `HELPMATE_API_BASE`
/// (applied to the selected provider), `HELPMATE_HOST`, `HELPMATE_PORT`.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(provider) = var("HELPMATE_PROVIDER") {
        config.agent.model.provider = provider;
    }
    if let Some(model) = var("HELPMATE_MODEL") {
        config.agent.model.model = model;
    }
    if let Some(base) = var("HELPMATE_API_BASE") {
        let provider = config.agent.model.provider.clone();
        let section = config.providers.get_or_insert(&provider).with_context(|| {
            format!("HELPMATE_API_BASE set but provider '{provider}' is unknown")
        })?;
        section.api_base = Some(base);
    }
    if let Some(host) = var("HELPMATE_HOST") {
        config.gateway.host = host;
    }
    if let Some(port) = var("HELPMATE_PORT") {
        config.gateway.port = port
            .parse()
            .with_context(|| format!("invalid HELPMATE_PORT '{port}'"))?;
    }
    Ok(())
}
