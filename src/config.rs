//! Configuration loading and merging for wallet-api.
//!
//! Settings are resolved in priority order: CLI flags override environment
//! variables, which override config file values, which override defaults.

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    cli::Cli,
    defaults::{
        default_data_dir_path, DEFAULT_CORS_ENABLED, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_cors_enabled() -> bool {
    DEFAULT_CORS_ENABLED
}

fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("cors_enabled", default_cors_enabled())?
            .set_default("server_host", default_server_host())?
            .set_default("server_port", default_server_port())?;

        if let Some(default_path) = default_data_dir_path() {
            builder =
                builder.set_default("data_dir", default_path.to_string_lossy().to_string())?;
        }

        if let Some(path) = cli.config_file.as_deref() {
            builder = builder.add_source(File::from(path));
        } else {
            let default_path = Path::new("wallet-api.toml");
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("WALLET_API")
                .separator("__")
                .list_separator(","),
        );

        for (env_key, config_key) in [
            ("WALLET_API_DATA_DIR", "data_dir"),
            ("WALLET_API_CORS_ENABLED", "cors_enabled"),
            ("WALLET_API_SERVER_HOST", "server_host"),
            ("WALLET_API_SERVER_PORT", "server_port"),
        ] {
            if let Ok(value) = env::var(env_key) {
                builder = builder.set_override(config_key, value)?;
            }
        }

        if let Some(value) = cli.data_dir.as_ref() {
            builder = builder.set_override("data_dir", value.to_string_lossy().to_string())?;
        }
        if let Some(value) = cli.cors_enabled.as_ref() {
            builder = builder.set_override("cors_enabled", value.to_string())?;
        }
        if let Some(value) = cli.server_host.as_ref() {
            builder = builder.set_override("server_host", value.clone())?;
        }
        if let Some(value) = cli.server_port.as_ref() {
            builder = builder.set_override("server_port", value.to_string())?;
        }

        let merged = builder.build()?;

        merged.try_deserialize()
    }
}
