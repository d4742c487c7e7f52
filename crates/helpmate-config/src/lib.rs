pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, find_config_path, load_config, save_config};
pub use schema::{
    AgentConfig, Config, EndpointsConfig, GatewayConfig, ModelRef, ProviderConfig,
    ProvidersConfig, ToolsConfig,
};
