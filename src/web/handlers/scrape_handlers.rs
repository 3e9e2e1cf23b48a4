// src/web/handlers/scrape_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::job_extraction::{ErrorCategory, ExtractionRequest, JobExtractor};
use crate::rate_limit::RateLimiter;
use crate::utils::parse_job_url;
use crate::web::types::*;

use rocket::serde::json::{self, Json};
use rocket::State;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub async fn scrape_job_handler(
    request: Result<Json<ScrapeJobRequest>, json::Error<'_>>,
    auth: AuthenticatedUser,
    limiter: &State<RateLimiter>,
    extractor: &State<JobExtractor>,
) -> ApiResponse {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("scrape_job", %request_id, user = %auth.user_id());

    async move {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let decision = limiter.check(auth.user_id(), now_ms);
        let headers = RateLimitHeaders {
            limit: limiter.max_requests(),
            decision,
            now_ms,
        };

        if !decision.allowed {
            warn!("Rate limit exceeded");
            return ApiResponse::error(ErrorCategory::RateLimited).with_rate_limit(headers);
        }

        let raw_url = match request {
            Ok(body) => body.into_inner().url,
            Err(e) => {
                warn!("Unreadable request body: {}", e);
                None
            }
        };

        let raw_url = match raw_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                return ApiResponse::error_with_message(ErrorCategory::BadInput, "Missing URL")
                    .with_rate_limit(headers);
            }
        };

        let url = match parse_job_url(&raw_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Rejected URL {}: {}", raw_url, e);
                return ApiResponse::error_with_message(ErrorCategory::BadInput, "Invalid URL")
                    .with_rate_limit(headers);
            }
        };

        info!("Extracting job data from {}", url);

        match extractor
            .extract(&ExtractionRequest::new(url, auth.user_id()))
            .await
        {
            Ok(fields) => ApiResponse::ok(&ScrapeJobResponse {
                success: true,
                data: fields,
            })
            .with_rate_limit(headers),
            Err(e) => {
                error!("Job extraction failed: {}", e);
                ApiResponse::error(e.category()).with_rate_limit(headers)
            }
        }
    }
    .instrument(span)
    .await
}
