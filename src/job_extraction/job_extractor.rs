// src/job_extraction/job_extractor.rs
use super::error::{ExtractionError, Result};
use super::generative::{build_prompt, parse_model_response, visible_text, PROMPT_TEXT_MAX_CHARS};
use super::job_scraper::PageFetcher;
use super::redirect::{unwrap_redirect, RedirectRule};
use super::structured::extract_job_posting;
use super::gemini_client::TextGenerator;
use super::types::{ExtractionRequest, FetchedPage, JobFields};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// One strategy in the extraction chain. `Ok(None)` hands over to the next.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    async fn extract(&self, page: &FetchedPage) -> Result<Option<JobFields>>;
}

pub struct StructuredDataExtractor;

#[async_trait]
impl FieldExtractor for StructuredDataExtractor {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    async fn extract(&self, page: &FetchedPage) -> Result<Option<JobFields>> {
        Ok(extract_job_posting(&page.html))
    }
}

pub struct GenerativeExtractor {
    generator: Option<Arc<dyn TextGenerator>>,
    max_text_chars: usize,
}

impl GenerativeExtractor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            max_text_chars: PROMPT_TEXT_MAX_CHARS,
        }
    }

    pub fn with_max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.max_text_chars = max_text_chars;
        self
    }
}

#[async_trait]
impl FieldExtractor for GenerativeExtractor {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn extract(&self, page: &FetchedPage) -> Result<Option<JobFields>> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            ExtractionError::Configuration("AI provider API key or model not configured".to_string())
        })?;

        let text = visible_text(&page.html, self.max_text_chars);
        let reply = generator.generate(&build_prompt(&text)).await?;

        let fields = parse_model_response(&reply);
        if fields.is_none() {
            warn!("Model reply for {} contained no usable JSON object", page.url);
        }
        Ok(fields)
    }
}

/// Resolves, fetches and runs the extractor chain for one posting.
pub struct JobExtractor {
    fetcher: Arc<dyn PageFetcher>,
    extractors: Vec<Box<dyn FieldExtractor>>,
    redirect_rules: Vec<RedirectRule>,
}

impl JobExtractor {
    /// Structured data first, model fallback second.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        generator: Option<Arc<dyn TextGenerator>>,
        redirect_rules: Vec<RedirectRule>,
    ) -> Self {
        Self {
            fetcher,
            extractors: vec![
                Box::new(StructuredDataExtractor),
                Box::new(GenerativeExtractor::new(generator)),
            ],
            redirect_rules,
        }
    }

    pub fn with_extractors(
        fetcher: Arc<dyn PageFetcher>,
        extractors: Vec<Box<dyn FieldExtractor>>,
        redirect_rules: Vec<RedirectRule>,
    ) -> Self {
        Self {
            fetcher,
            extractors,
            redirect_rules,
        }
    }

    pub async fn extract(&self, request: &ExtractionRequest) -> Result<JobFields> {
        let url = unwrap_redirect(&request.url, &self.redirect_rules);
        info!(
            "Extracting job fields from {} for {}",
            url, request.caller_identity
        );

        let html = self.fetcher.fetch(&url).await?;
        let page = FetchedPage { url, html };

        for extractor in &self.extractors {
            if let Some(fields) = extractor.extract(&page).await? {
                info!("Extracted job fields via {}", extractor.name());
                return Ok(fields);
            }
        }

        Err(ExtractionError::NothingExtracted)
    }
}
