// src/web/types.rs
use crate::analytics::{AnalyticsSummary, ApplicationRecord};
use crate::job_extraction::{ErrorCategory, JobFields};
use crate::rate_limit::RateLimitDecision;
use rocket::http::{Header, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ScrapeJobRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScrapeJobResponse {
    pub success: bool,
    pub data: JobFields,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalyticsRequest {
    pub applications: Vec<ApplicationRecord>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalyticsResponse {
    pub success: bool,
    pub data: AnalyticsSummary,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
        }
    }

    pub fn from_category(category: ErrorCategory) -> Self {
        Self::new(category.message(), category.code())
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Rate-limit state reported back to the caller as headers.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitHeaders {
    pub limit: usize,
    pub decision: RateLimitDecision,
    pub now_ms: i64,
}

impl RateLimitHeaders {
    fn retry_after_secs(&self) -> i64 {
        let wait_ms = (self.decision.retry_at - self.now_ms).max(0);
        (wait_ms + 999) / 1000
    }
}

/// JSON body with an explicit status and optional rate-limit headers.
pub struct ApiResponse {
    pub status: Status,
    pub body: Value,
    pub rate_limit: Option<RateLimitHeaders>,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::with_status(Status::Ok, body)
    }

    pub fn error(category: ErrorCategory) -> Self {
        Self::with_status(category.status(), &ErrorResponse::from_category(category))
    }

    pub fn error_with_message(category: ErrorCategory, message: &str) -> Self {
        Self::with_status(
            category.status(),
            &ErrorResponse::new(message, category.code()),
        )
    }

    fn with_status<T: Serialize>(status: Status, body: &T) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "error": "Internal server error" })
        });
        Self {
            status,
            body,
            rate_limit: None,
        }
    }

    pub fn with_rate_limit(mut self, headers: RateLimitHeaders) -> Self {
        self.rate_limit = Some(headers);
        self
    }
}

impl<'r> Responder<'r, 'static> for ApiResponse {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Response::build_from(Json(self.body).respond_to(request)?)
            .status(self.status)
            .finalize();

        if let Some(rate_limit) = self.rate_limit {
            response.set_header(Header::new("X-RateLimit-Limit", rate_limit.limit.to_string()));
            response.set_header(Header::new(
                "X-RateLimit-Remaining",
                rate_limit.decision.remaining.to_string(),
            ));
            response.set_header(Header::new(
                "X-RateLimit-Reset",
                rate_limit.decision.reset_time.to_string(),
            ));
            if !rate_limit.decision.allowed {
                response.set_header(Header::new(
                    "Retry-After",
                    rate_limit.retry_after_secs().to_string(),
                ));
            }
        }

        Ok(response)
    }
}
