//! Command-line interface for wallet-api.
//!
//! This module defines the CLI arguments parsed by [`clap`] and used to
//! configure the server at startup.

use clap::{CommandFactory, FromArgMatches, Parser};
use std::{env, ffi::OsString, path::PathBuf};

use crate::defaults::{default_data_dir_path, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Command-line flags used to bootstrap configuration.
#[derive(Debug, Parser)]
#[command(name = "wallet-api", about = "REST API serving user wallet balances")]
pub struct Cli {
    /// Optional path to a configuration file (TOML, YAML, or JSON supported by `config` crate, defaults to `wallet-api.toml` when present)
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Directory containing the wallet SQLite database
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Whether to enable CORS responses (default: enabled)
    #[arg(long, value_name = "BOOL")]
    pub cors_enabled: Option<bool>,

    /// Bind address for the HTTP server (default: 0.0.0.0)
    #[arg(long, value_name = "HOST")]
    pub server_host: Option<String>,

    /// Bind port for the HTTP server (default: 3000)
    #[arg(long, value_name = "PORT")]
    pub server_port: Option<u16>,
}

impl Cli {
    pub fn gather() -> Self {
        Self::gather_from(Self::runtime_args())
    }

    pub fn gather_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = <Self as CommandFactory>::command();

        if let Some(default_path) = default_data_dir_path() {
            let help = format!(
                "Directory containing the wallet SQLite database (default: {})",
                default_path.display()
            );
            // The argument id uses the field name (data_dir), not the long flag (data-dir).
            cmd = cmd.mut_arg("data_dir", |arg| arg.help(help));
        }

        cmd = cmd.mut_arg("cors_enabled", |arg| {
            arg.help("Whether to enable CORS responses (default: true)")
        });

        cmd = cmd.mut_arg("server_host", |arg| {
            arg.help(format!(
                "Bind address for the HTTP server (default: {DEFAULT_SERVER_HOST})"
            ))
        });

        cmd = cmd.mut_arg("server_port", |arg| {
            arg.help(format!(
                "Bind port for the HTTP server (default: {DEFAULT_SERVER_PORT})"
            ))
        });

        let matches = cmd.get_matches_from(args);
        match <Self as FromArgMatches>::from_arg_matches(&matches) {
            Ok(cli) => cli,
            Err(err) => err.exit(),
        }
    }

    fn runtime_args() -> Vec<OsString> {
        #[cfg(test)]
        if let Ok(raw) = env::var("WALLET_API_TEST_ARGS") {
            return raw.split_whitespace().map(OsString::from).collect();
        }

        env::args_os().collect()
    }
}
