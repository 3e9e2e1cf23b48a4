// src/web/handlers/analytics_handlers.rs
use crate::analytics::summarize;
use crate::auth::AuthenticatedUser;
use crate::job_extraction::ErrorCategory;
use crate::web::types::*;

use rocket::serde::json::{self, Json};
use tracing::{info, warn};

pub async fn analytics_handler(
    request: Result<Json<AnalyticsRequest>, json::Error<'_>>,
    auth: AuthenticatedUser,
) -> ApiResponse {
    let request = match request {
        Ok(body) => body.into_inner(),
        Err(e) => {
            warn!("Invalid analytics payload from {}: {}", auth.user_id(), e);
            return ApiResponse::error_with_message(
                ErrorCategory::BadInput,
                "Invalid applications payload",
            );
        }
    };

    info!(
        "Summarizing {} applications for {}",
        request.applications.len(),
        auth.user_id()
    );

    let summary = summarize(&request.applications, chrono::Utc::now().date_naive());
    ApiResponse::ok(&AnalyticsResponse {
        success: true,
        data: summary,
    })
}
