use rocket::http::Status;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Target unreachable: {0}")]
    Unreachable(String),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Upstream returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Failure after the connection was established (reset, protocol error, bad body).
    #[error("Transfer from {target} failed: {message}")]
    Transport { target: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Could not extract job data from the provided URL")]
    NothingExtracted,
}

impl ExtractionError {
    /// Classify a transport error from a page or proxy fetch.
    pub fn from_fetch(err: reqwest::Error, target: &str) -> Self {
        if err.is_timeout() {
            ExtractionError::Timeout(target.to_string())
        } else if err.is_connect() || err.is_builder() {
            ExtractionError::Unreachable(err.to_string())
        } else if let Some(status) = err.status() {
            ExtractionError::UpstreamStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ExtractionError::Transport {
                target: target.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractionError::Unreachable(_) => ErrorCategory::UpstreamUnreachable,
            ExtractionError::Configuration(_) => ErrorCategory::ConfigurationError,
            ExtractionError::Timeout(_)
            | ExtractionError::UpstreamStatus { .. }
            | ExtractionError::Transport { .. }
            | ExtractionError::Generation(_)
            | ExtractionError::NothingExtracted => ErrorCategory::ExtractionFailed,
        }
    }
}

/// Caller-facing failure classes. Only these cross the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadInput,
    Unauthenticated,
    RateLimited,
    UpstreamUnreachable,
    ConfigurationError,
    ExtractionFailed,
}

impl ErrorCategory {
    pub fn status(&self) -> Status {
        match self {
            ErrorCategory::BadInput | ErrorCategory::UpstreamUnreachable => Status::BadRequest,
            ErrorCategory::Unauthenticated => Status::Unauthorized,
            ErrorCategory::RateLimited => Status::TooManyRequests,
            ErrorCategory::ConfigurationError | ErrorCategory::ExtractionFailed => {
                Status::InternalServerError
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCategory::BadInput => "Invalid request",
            ErrorCategory::Unauthenticated => "Unauthorized",
            ErrorCategory::RateLimited => "Too many requests, try again later",
            ErrorCategory::UpstreamUnreachable => "Invalid URL or website unreachable",
            ErrorCategory::ConfigurationError => "API configuration error",
            ErrorCategory::ExtractionFailed => "Failed to extract job data",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::BadInput => "BAD_INPUT",
            ErrorCategory::Unauthenticated => "UNAUTHENTICATED",
            ErrorCategory::RateLimited => "RATE_LIMITED",
            ErrorCategory::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            ErrorCategory::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCategory::ExtractionFailed => "EXTRACTION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_map_to_statuses() {
        assert_eq!(
            ExtractionError::Unreachable("dns".into()).category().status(),
            Status::BadRequest
        );
        assert_eq!(
            ExtractionError::Configuration("no key".into())
                .category()
                .status(),
            Status::InternalServerError
        );
        assert_eq!(
            ExtractionError::NothingExtracted.category(),
            ErrorCategory::ExtractionFailed
        );
        assert_eq!(
            ExtractionError::UpstreamStatus {
                status: 503,
                message: String::new()
            }
            .category(),
            ErrorCategory::ExtractionFailed
        );
        assert_eq!(
            ExtractionError::Transport {
                target: "https://jobs.example.com".into(),
                message: "connection reset".into()
            }
            .category(),
            ErrorCategory::ExtractionFailed
        );
        assert_eq!(ErrorCategory::RateLimited.status(), Status::TooManyRequests);
    }
}
