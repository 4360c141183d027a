use service_core::config as core_config;
use service_core::error::AppError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FishConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
}

impl FishConfig {
    /// Loads `.env` (never overriding variables already set), then reads the
    /// process environment.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, AppError> {
        // The connection string is checked first so a missing URI is reported
        // before anything else is looked at.
        let uri = require_env(vars, "MONGO_URI")?;
        let common = core_config::Config::from_vars(vars)?;

        Ok(FishConfig {
            common,
            mongodb: MongoConfig { uri },
        })
    }
}

fn require_env(vars: &HashMap<String, String>, key: &str) -> Result<String, AppError> {
    vars.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_mongo_uri_is_rejected() {
        let err = FishConfig::from_vars(&vars(&[("PORT", "9000")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("MONGO_URI"));
    }

    #[test]
    fn empty_mongo_uri_is_rejected() {
        let err = FishConfig::from_vars(&vars(&[("MONGO_URI", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn port_defaults_to_8080() {
        let config =
            FishConfig::from_vars(&vars(&[("MONGO_URI", "mongodb://localhost:27017")])).unwrap();
        assert_eq!(config.mongodb.uri, "mongodb://localhost:27017");
        assert_eq!(config.common.port, 8080);
    }

    #[test]
    fn explicit_port_is_used() {
        let config = FishConfig::from_vars(&vars(&[
            ("MONGO_URI", "mongodb+srv://cluster0.example.net"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.common.port, 3000);
    }

    #[test]
    fn uri_is_not_validated_beyond_presence() {
        let config = FishConfig::from_vars(&vars(&[("MONGO_URI", "not a uri")])).unwrap();
        assert_eq!(config.mongodb.uri, "not a uri");
    }
}
