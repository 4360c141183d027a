use crate::error::AppError;
use config::{Config as Cfg, Environment, File, Map};
use serde::Deserialize;
use std::collections::HashMap;

/// Environment variables that feed the base configuration.
const ENV_KEYS: &[&str] = &["PORT", "LOG_LEVEL", "OTLP_ENDPOINT"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    /// Builds the base configuration from an explicit variable map, layered over
    /// an optional `configuration` file. Empty values count as unset.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, AppError> {
        let env: Map<String, String> = ENV_KEYS
            .iter()
            .filter_map(|key| {
                vars.get(*key)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().source(Some(env)).try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
