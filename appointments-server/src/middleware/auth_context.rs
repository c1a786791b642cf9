//! Authentication context extraction
//!
//! Every appointment endpoint takes an [`AuthContext`] argument. Extraction
//! reads the `Authorization: Bearer <token>` header, verifies the HS256
//! signature and expiry with the server's [`JwtVerifier`] and exposes the
//! caller's roles. Handlers then call [`AuthContext::require_role`].

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppointmentsServer;

/// Role required by every appointment operation
pub const DOCTOR_ROLE: &str = "doctor";

/// JWT claims understood by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Authentication context extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub roles: Vec<String>,
    pub email: Option<String>,
}

impl AuthContext {
    /// Whether the caller holds `role`. Matching ignores case and an optional `ROLE_` prefix.
    pub fn has_role(&self, role: &str) -> bool {
        let wanted = normalize_role(role);
        self.roles.iter().any(|r| normalize_role(r) == wanted)
    }

    /// Require a role - returns an authorization error if it is missing
    pub fn require_role(&self, role: &str) -> Result<(), ApiError> {
        if self.has_role(role) {
            return Ok(());
        }
        debug!(user_id = %self.user_id, role, "Caller lacks required role");
        Err(ApiError::authorization(format!("Role '{}' is required", role)))
    }
}

fn normalize_role(role: &str) -> String {
    let lower = role.trim().to_lowercase();
    match lower.strip_prefix("role_") {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

/// Verifies HS256 tokens against the configured secret
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate JWT token and extract claims
    pub fn verify(&self, token: &str) -> Result<AuthContext, ApiError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| ApiError::invalid_token(format!("Invalid or expired token: {}", e)))?;

        let claims = token_data.claims;
        Ok(AuthContext {
            user_id: claims.sub,
            roles: claims.roles,
            email: claims.email,
        })
    }
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

/// Extract the bearer token from the Authorization header
fn extract_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::missing_credentials("Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::missing_credentials("Invalid Authorization header format. Expected: Bearer <token>")
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    AppointmentsServer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let server = AppointmentsServer::from_ref(state);
        let token = extract_token(parts)?;
        server.jwt.verify(token)
    }
}
