// src/job_extraction/job_scraper.rs
use super::error::{ExtractionError, Result};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Upper bound on how much of an error page is kept in `UpstreamStatus`.
const ERROR_BODY_MAX_CHARS: usize = 200;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Retrieves the HTML of a job posting.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(DESKTOP_USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ExtractionError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

async fn read_success_body(response: reqwest::Response, target: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = truncate_chars(body.trim(), ERROR_BODY_MAX_CHARS);
        warn!("Fetch of {} returned {}", target, status);
        return Err(ExtractionError::UpstreamStatus {
            status: status.as_u16(),
            message,
        });
    }

    response
        .text()
        .await
        .map_err(|e| ExtractionError::from_fetch(e, target))
}

/// Plain GET against the posting itself.
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl PageFetcher for DirectFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        info!("Fetching job post: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ExtractionError::from_fetch(e, url.as_str()))?;

        read_success_body(response, url.as_str()).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub base_url: String,
    /// Puppeteer lifecycle event to wait for, e.g. `networkidle2`.
    pub wait_until: String,
    pub wait_timeout_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions<'a> {
    wait_until: &'a str,
    timeout: u64,
}

/// Fetches through a headless-browser `/content` endpoint so that
/// script-rendered postings arrive with their content filled in.
pub struct RenderingFetcher {
    client: Client,
    settings: RenderSettings,
    token: Option<String>,
}

impl RenderingFetcher {
    pub fn new(settings: RenderSettings, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            settings: RenderSettings {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                ..settings
            },
            token,
        })
    }
}

#[async_trait]
impl PageFetcher for RenderingFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let token = self.token.as_deref().ok_or_else(|| {
            ExtractionError::Configuration("Rendering proxy token not configured".to_string())
        })?;

        let endpoint = format!("{}/content", self.settings.base_url);
        let body = ContentRequest {
            url: url.as_str(),
            goto_options: GotoOptions {
                wait_until: &self.settings.wait_until,
                timeout: self.settings.wait_timeout_ms,
            },
        };

        info!("Fetching rendered job post via {}: {}", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("token", token)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::from_fetch(e, &endpoint))?;

        read_success_body(response, &endpoint).await
    }
}
