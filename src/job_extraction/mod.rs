// src/job_extraction/mod.rs
//! Turns a job-posting URL into pre-filled application fields.

pub mod error;
pub mod gemini_client;
pub mod generative;
pub mod job_extractor;
pub mod job_scraper;
pub mod redirect;
pub mod structured;
pub mod types;

pub use error::{ErrorCategory, ExtractionError};
pub use gemini_client::{GeminiClient, TextGenerator};
pub use job_extractor::{FieldExtractor, GenerativeExtractor, JobExtractor, StructuredDataExtractor};
pub use job_scraper::{DirectFetcher, PageFetcher, RenderSettings, RenderingFetcher};
pub use redirect::RedirectRule;
pub use types::{ExtractionRequest, JobFields};

use crate::core::ConfigManager;
use crate::environment::FetchMode;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

impl JobExtractor {
    /// Build the fetcher and extractor chain described by the configuration.
    ///
    /// Absent AI credentials leave the fallback without a generator; that
    /// only fails requests which actually need it.
    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        let env = &config.environment;
        let fetch_timeout = Duration::from_secs(env.fetch.timeout_secs);

        let fetcher: Arc<dyn PageFetcher> = match env.fetch.mode {
            FetchMode::Direct => Arc::new(
                DirectFetcher::new(fetch_timeout).context("Failed to create page fetcher")?,
            ),
            FetchMode::Rendered => {
                let settings = env
                    .fetch
                    .rendering
                    .clone()
                    .context("Rendered fetch mode requires fetch.rendering settings")?;
                Arc::new(
                    RenderingFetcher::new(
                        settings,
                        config.secrets.browserless_token.clone(),
                        fetch_timeout,
                    )
                    .context("Failed to create rendering fetcher")?,
                )
            }
        };

        let generator: Option<Arc<dyn TextGenerator>> =
            match (&config.secrets.gemini_api_key, &config.secrets.gemini_model) {
                (Some(key), Some(model)) => Some(Arc::new(
                    GeminiClient::new(key, model, Duration::from_secs(env.generation.timeout_secs))
                        .context("Failed to create Gemini client")?,
                )),
                _ => None,
            };

        let extractors: Vec<Box<dyn FieldExtractor>> = vec![
            Box::new(StructuredDataExtractor),
            Box::new(
                GenerativeExtractor::new(generator)
                    .with_max_text_chars(env.generation.prompt_max_chars),
            ),
        ];

        Ok(Self::with_extractors(
            fetcher,
            extractors,
            env.redirect_rules.clone(),
        ))
    }
}
