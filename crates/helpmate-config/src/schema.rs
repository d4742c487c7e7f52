use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub providers: ProvidersConfig,
    pub gateway: GatewayConfig,
    pub tools: ToolsConfig,
}

/// Reference to a provider + model combination.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub model: ModelRef,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on model calls per chat request.
    pub max_tool_rounds: u32,
    /// Overrides the built-in assistant preamble when set.
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: ModelRef::default(),
            max_tokens: 2048,
            temperature: 0.7,
            max_tool_rounds: 8,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub ollama: Option<ProviderConfig>,
    pub anthropic: Option<ProviderConfig>,
    pub openai: Option<ProviderConfig>,
    pub openrouter: Option<ProviderConfig>,
    pub deepseek: Option<ProviderConfig>,
    pub groq: Option<ProviderConfig>,
}

impl ProvidersConfig {
    /// Look up a provider section by its config key.
    pub fn get(&self, provider: &str) -> Option<&ProviderConfig> {
        match provider {
            "ollama" => self.ollama.as_ref(),
            "anthropic" => self.anthropic.as_ref(),
            "openai" => self.openai.as_ref(),
            "openrouter" => self.openrouter.as_ref(),
            "deepseek" => self.deepseek.as_ref(),
            "groq" => self.groq.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, provider: &str) -> Option<&mut Option<ProviderConfig>> {
        match provider {
            "ollama" => Some(&mut self.ollama),
            "anthropic" => Some(&mut self.anthropic),
            "openai" => Some(&mut self.openai),
            "openrouter" => Some(&mut self.openrouter),
            "deepseek" => Some(&mut self.deepseek),
            "groq" => Some(&mut self.groq),
            _ => None,
        }
    }

    /// Mutable access to a provider section, creating it if absent.
    /// Returns `None` for unknown provider names.
    pub fn get_or_insert(&mut self, provider: &str) -> Option<&mut ProviderConfig> {
        self.slot_mut(provider)
            .map(|slot| slot.get_or_insert_with(ProviderConfig::default))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    /// Timeout applied to every outbound tool request.
    pub timeout_secs: u64,
    pub endpoints: EndpointsConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            endpoints: EndpointsConfig::default(),
        }
    }
}

/// Base URLs of the public data APIs the tools call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointsConfig {
    pub weather: String,
    pub currency: String,
    pub world_time: String,
    pub quotes: String,
    pub jokes: String,
    pub encyclopedia: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            weather: "https://wttr.in".into(),
            currency: "https://api.frankfurter.app".into(),
            world_time: "http://worldtimeapi.org".into(),
            quotes: "https://zenquotes.io".into(),
            jokes: "https://official-joke-api.appspot.com".into(),
            encyclopedia: "https://en.wikipedia.org".into(),
        }
    }
}
