// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser};
use crate::core::ConfigManager;
use crate::job_extraction::{ErrorCategory, JobExtractor};
use crate::rate_limit::RateLimiter;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::{self, Json};
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Authorization, Content-Type",
        ));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "X-RateLimit-Limit, X-RateLimit-Remaining, X-RateLimit-Reset, Retry-After",
        ));
    }
}

#[post("/scrape-job", data = "<request>")]
pub async fn scrape_job(
    request: Result<Json<ScrapeJobRequest>, json::Error<'_>>,
    auth: AuthenticatedUser,
    limiter: &State<RateLimiter>,
    extractor: &State<JobExtractor>,
) -> ApiResponse {
    handlers::scrape_job_handler(request, auth, limiter, extractor).await
}

#[post("/analytics", data = "<request>")]
pub async fn analytics(
    request: Result<Json<AnalyticsRequest>, json::Error<'_>>,
    auth: AuthenticatedUser,
) -> ApiResponse {
    handlers::analytics_handler(request, auth).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request", ErrorCategory::BadInput.code()))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<ErrorResponse> {
    Json(ErrorResponse::from_category(ErrorCategory::Unauthenticated))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Not found", "NOT_FOUND"))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request", ErrorCategory::BadInput.code()))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR"))
}

/// Attach state, routes and catchers to `rocket`.
pub fn mount_api(
    rocket: Rocket<Build>,
    extractor: JobExtractor,
    limiter: RateLimiter,
    auth_config: AuthConfig,
) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(extractor)
        .manage(limiter)
        .manage(auth_config)
        .register(
            "/api",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount("/api", routes![scrape_job, analytics, health, options])
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let extractor = JobExtractor::from_config(&config)?;
    let limiter = RateLimiter::from_config(&config.environment.rate_limit);
    let auth_config = AuthConfig::new(
        config.environment.auth.audience.clone(),
        config.secrets.jwt_secret.clone(),
    );

    info!("Starting job extraction API server");
    info!("Fetch mode: {:?}", config.environment.fetch.mode);
    info!(
        "Rate limit: {} requests per {} ms",
        limiter.max_requests(),
        config.environment.rate_limit.window_ms
    );
    info!("Server: http://0.0.0.0:{}", config.port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    mount_api(rocket::custom(figment), extractor, limiter, auth_config)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
