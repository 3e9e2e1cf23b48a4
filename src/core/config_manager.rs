// src/core/config_manager.rs
//! Unified configuration: file-based settings plus secrets from the environment

use crate::environment::EnvironmentConfig;
use anyhow::{Context, Result};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8000;

/// Credentials that never live in `config.yaml`.
#[derive(Clone, Default)]
pub struct SecretsConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub browserless_token: Option<String>,
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "***"))
            .field("gemini_model", &self.gemini_model)
            .field("browserless_token", &self.browserless_token.as_ref().map(|_| "***"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

impl SecretsConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL_VERSION"),
            browserless_token: non_empty_var("BROWSERLESS_TOKEN"),
            jwt_secret: non_empty_var("SUPABASE_JWT_SECRET"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub secrets: SecretsConfig,
    pub port: u16,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let secrets = SecretsConfig::from_env();
        let port = Self::load_port()?;

        let config = Self {
            environment,
            secrets,
            port,
        };
        config.report_missing_secrets();
        Ok(config)
    }

    fn load_port() -> Result<u16> {
        match std::env::var("ROCKET_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("ROCKET_PORT must be a valid port number, got {}", raw)),
            Err(_) => Ok(DEFAULT_PORT),
        }
    }

    /// Missing AI credentials only fail requests that reach the fallback,
    /// so startup warns instead of refusing to run.
    fn report_missing_secrets(&self) {
        if self.secrets.gemini_api_key.is_none() || self.secrets.gemini_model.is_none() {
            warn!("GEMINI_API_KEY or GEMINI_MODEL_VERSION not set; model fallback disabled");
        }
        if self.secrets.jwt_secret.is_none() {
            warn!("SUPABASE_JWT_SECRET not set; authenticated endpoints will reject every request");
        }
        info!("Configuration loaded: {:?}", self.secrets);
    }
}
