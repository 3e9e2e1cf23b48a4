// src/environment.rs
use crate::job_extraction::redirect::{default_rules, RedirectRule};
use crate::job_extraction::RenderSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    Direct,
    Rendered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "FetchConfig::default_mode")]
    pub mode: FetchMode,
    #[serde(default = "FetchConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub rendering: Option<RenderSettings>,
}

impl FetchConfig {
    fn default_mode() -> FetchMode {
        FetchMode::Direct
    }

    fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: Self::default_mode(),
            timeout_secs: Self::default_timeout_secs(),
            rendering: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "GenerationConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "GenerationConfig::default_prompt_max_chars")]
    pub prompt_max_chars: usize,
}

impl GenerationConfig {
    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_prompt_max_chars() -> usize {
        crate::job_extraction::generative::PROMPT_TEXT_MAX_CHARS
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            prompt_max_chars: Self::default_prompt_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_ms: i64,
    pub sweep_threshold: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_ms: 60_000,
            sweep_threshold: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub audience: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            audience: "authenticated".to_string(),
        }
    }
}

/// Non-secret settings for one deployment environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default = "default_rules")]
    pub redirect_rules: Vec<RedirectRule>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(&PathBuf::from("config.yaml"), &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("JOBIFY_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found. Server cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        env_config.validate()?;
        Ok(env_config)
    }

    fn validate(&self) -> Result<()> {
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_ms <= 0 {
            anyhow::bail!("rate_limit.max_requests and rate_limit.window_ms must be positive");
        }
        if self.fetch.mode == FetchMode::Rendered && self.fetch.rendering.is_none() {
            anyhow::bail!("fetch.mode is 'rendered' but no fetch.rendering section is configured");
        }
        Ok(())
    }
}
