// src/lib.rs
//! Job-posting extraction service: turns a posting URL into pre-filled
//! application fields, behind token auth and a per-caller rate limit.

pub mod analytics;
pub mod auth;
pub mod core;
pub mod environment;
pub mod job_extraction;
pub mod rate_limit;
pub mod utils;
pub mod web;

pub use crate::core::ConfigManager;
pub use job_extraction::{ExtractionRequest, JobExtractor, JobFields};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use web::{mount_api, start_web_server};
