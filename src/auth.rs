// src/auth.rs
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Access-token claims issued by the hosted auth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

pub struct AuthConfig {
    pub audience: String,
    jwt_secret: Option<String>,
}

impl AuthConfig {
    pub fn new(audience: String, jwt_secret: Option<String>) -> Self {
        Self {
            audience,
            jwt_secret,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let secret = self
            .jwt_secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("JWT secret not configured"))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

/// Caller identity established from a verified bearer token
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::NotConfigured)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match req.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) if !token.trim().is_empty() => token.trim(),
                _ => {
                    warn!("Invalid Authorization header format");
                    return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
                }
            },
            None => {
                warn!("Missing Authorization header");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        match auth_config.verify(token) {
            Ok(claims) => {
                let user = AuthenticatedUser::from(claims);
                info!("User {} authenticated", user.user_id);
                Outcome::Success(user)
            }
            Err(e) => {
                warn!("Token verification failed: {}", e);
                Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed))
            }
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotConfigured,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotConfigured => "Authentication is not configured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, aud: &str, secret: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            aud: aud.to_string(),
            email: Some(format!("{}@example.com", sub)),
            role: Some("authenticated".to_string()),
            exp,
            iat: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn config() -> AuthConfig {
        AuthConfig::new("authenticated".to_string(), Some(SECRET.to_string()))
    }

    #[test]
    fn test_verify_valid_token() {
        let token = token_for("user-42", "authenticated", SECRET, 3600);
        let claims = config().verify(&token).unwrap();
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.email.as_deref(), Some("user-42@example.com"));
    }

    #[test]
    fn test_rejects_wrong_secret_audience_and_expiry() {
        let wrong_secret = token_for("u", "authenticated", "other", 3600);
        assert!(config().verify(&wrong_secret).is_err());

        let wrong_audience = token_for("u", "anon", SECRET, 3600);
        assert!(config().verify(&wrong_audience).is_err());

        let expired = token_for("u", "authenticated", SECRET, -3600);
        assert!(config().verify(&expired).is_err());
    }

    #[test]
    fn test_missing_secret_rejects_everything() {
        let token = token_for("u", "authenticated", SECRET, 3600);
        let unconfigured = AuthConfig::new("authenticated".to_string(), None);
        assert!(unconfigured.verify(&token).is_err());
    }
}
