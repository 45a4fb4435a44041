//! tabletopd - tabletop RPG companion daemon
//!
//! A dice-notation engine and a random encounter generator behind a small
//! JSON API. Both cores are pure request-per-call logic; the only shared
//! mutable state is the bounded roll ledger.

pub mod api;
pub mod bestiary;
pub mod dice;
pub mod encounter;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use bestiary::Bestiary;
use dice::Roller;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// How many roll outcomes the ledger retains
    pub history_capacity: usize,
    /// Optional JSON creature catalog; None = built-in bestiary
    pub bestiary_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            history_capacity: dice::DEFAULT_HISTORY_CAPACITY,
            bestiary_path: None,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `TABLETOPD_`-prefixed environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("TABLETOPD_"))
            .extract()
            .context("invalid configuration")
    }
}

/// The tabletopd server instance
pub struct Server {
    config: Config,
    roller: Arc<Roller>,
    bestiary: Arc<Bestiary>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Result<Self> {
        let bestiary = match &config.bestiary_path {
            Some(path) => Bestiary::from_json_file(path)
                .with_context(|| format!("loading bestiary from {}", path.display()))?,
            None => Bestiary::builtin(),
        };
        info!("bestiary loaded with {} creatures", bestiary.len());

        let roller = Arc::new(Roller::new(config.history_capacity));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            roller,
            bestiary: Arc::new(bestiary),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the dice service handle
    pub fn roller(&self) -> Arc<Roller> {
        self.roller.clone()
    }

    /// Get the creature catalog handle
    pub fn bestiary(&self) -> Arc<Bestiary> {
        self.bestiary.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.roller.clone(), self.bestiary.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("tabletopd listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("tabletopd shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.history_capacity, dice::DEFAULT_HISTORY_CAPACITY);
        assert!(config.bestiary_path.is_none());
    }

    #[test]
    fn test_config_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"0.0.0.0:9999\"").unwrap();
        writeln!(file, "history_capacity = 7").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.bind_addr.port(), 9999);
        assert_eq!(config.history_capacity, 7);
    }

    #[test]
    fn test_server_new_with_builtin_bestiary() {
        let server = Server::new(Config::default()).unwrap();
        assert_eq!(server.bestiary().len(), 30);
        assert_eq!(server.roller().history_len(), 0);
    }

    #[test]
    fn test_server_new_rejects_missing_bestiary_file() {
        let config = Config {
            bestiary_path: Some(PathBuf::from("/nonexistent/bestiary.json")),
            ..Default::default()
        };
        assert!(Server::new(config).is_err());
    }
}
