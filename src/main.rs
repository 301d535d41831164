//! wallet-api is a REST API exposing per-user wallets over HTTP. It serves
//! balance lookups, top-ups, and transaction listings backed by a SQLite
//! database the service owns and migrates at startup.
mod cli;
mod config;
mod defaults;
mod repository;
mod routes;
mod sqlitepool;

use axum::Router;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crate::{
    cli::Cli,
    config::AppConfig,
    defaults::default_data_dir_path,
    repository::WalletRepository,
    routes::create_router,
    sqlitepool::{build_sqlite_pool, SqlitePool},
};

#[derive(Clone)]
pub struct AppState {
    pub sqlite_pool: SqlitePool,
    pub repository: WalletRepository,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sqlite_pool", &"SqlitePool")
            .field("repository", &self.repository)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct BootstrapOverrides {
    pub sqlite_pool: Option<SqlitePool>,
}

#[derive(Debug)]
pub struct BootstrapOutput {
    pub state: AppState,
    pub router: Router,
    pub server_host: String,
    pub server_port: u16,
}

fn resolve_data_dir(config: &AppConfig) -> Result<PathBuf, String> {
    config
        .data_dir
        .clone()
        .or_else(default_data_dir_path)
        .ok_or_else(|| {
            "data_dir is required (set --data-dir, WALLET_API_DATA_DIR, or ensure the OS user data directory is available)".to_string()
        })
}

async fn bootstrap(
    cli_args: Cli,
    overrides: BootstrapOverrides,
) -> Result<BootstrapOutput, String> {
    let config =
        AppConfig::load(&cli_args).map_err(|err| format!("Failed to load configuration: {err}"))?;

    let data_dir = resolve_data_dir(&config)?;
    std::fs::create_dir_all(&data_dir)
        .map_err(|err| format!("Failed to create data directory {data_dir:?}: {err}"))?;

    let sqlite_path = data_dir.join("wallet.sqlite3");
    let sqlite_pool = match overrides.sqlite_pool {
        Some(pool) => pool,
        None => build_sqlite_pool(&sqlite_path)
            .map_err(|err| format!("Failed to build SQLite pool: {err}"))?,
    };

    let server_host = config.server_host;
    let server_port = config.server_port;

    let state = AppState {
        sqlite_pool: sqlite_pool.clone(),
        repository: WalletRepository::new(sqlite_pool),
    };
    let router = create_router(state.clone(), config.cors_enabled);

    Ok(BootstrapOutput {
        state,
        router,
        server_host,
        server_port,
    })
}

#[tokio::main]
async fn main() {
    let cli_args = Cli::gather();

    match bootstrap(cli_args, BootstrapOverrides::default()).await {
        Ok(BootstrapOutput {
            router,
            server_host,
            server_port,
            ..
        }) => {
            let listener = TcpListener::bind((server_host.as_str(), server_port))
                .await
                .unwrap_or_else(|err| {
                    panic!("failed to bind listener on {server_host}:{server_port}: {err}")
                });
            println!(
                "wallet-api listening on http://{}",
                listener.local_addr().unwrap()
            );

            if let Err(err) = axum::serve(listener, router).await {
                eprintln!("server error: {err}");
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
