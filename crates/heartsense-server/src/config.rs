//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL_PATH: &str = "models/model.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Runtime settings read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact to load (`MODEL_PATH`).
    pub model_path: PathBuf,
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `MODEL_PATH` and `BIND_ADDR`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model_path = var("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.into());
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid BIND_ADDR '{}'", bind_addr))?;

        Ok(Self {
            model_path: model_path.into(),
            bind_addr,
        })
    }
}
