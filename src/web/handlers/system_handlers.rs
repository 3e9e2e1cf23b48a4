// src/web/handlers/system_handlers.rs
use crate::web::types::*;

use rocket::serde::json::Json;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
