//! Access-token authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::ApiKeyRepository;
use shared::crypto::{sha256_hex, token_prefix};

/// Header carrying the caller's access token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// The authenticated caller. All template access is scoped to `account_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub account_id: i64,
    pub email: String,
    pub api_key_id: i64,
}

impl CurrentUser {
    /// Resolves an access token to its user.
    pub async fn authenticate(pool: &PgPool, token: &str) -> Result<Self, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(unauthorized());
        }

        let repo = ApiKeyRepository::new(pool.clone());
        let key = repo
            .find_by_key_hash(&sha256_hex(token))
            .await
            .map_err(|e| {
                tracing::error!("Database error during token lookup: {}", e);
                ApiError::Internal("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| {
                debug!(token_prefix = token_prefix(token), "Unknown access token");
                unauthorized()
            })?;

        if !ApiKeyRepository::is_key_valid_at(&key, Utc::now()) {
            debug!(api_key_id = key.id, "Inactive or expired access token");
            return Err(unauthorized());
        }

        let key_id = key.id;
        tokio::spawn(async move {
            if let Err(e) = repo.update_last_used(key_id).await {
                warn!("Failed to update last_used_at: {}", e);
            }
        });

        Ok(CurrentUser {
            user_id: key.user_id,
            account_id: key.account_id,
            email: key.email,
            api_key_id: key.id,
        })
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Invalid or missing access token".to_string())
}

/// Reuses the user the auth middleware stored, authenticating otherwise.
#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(unauthorized)?;

        Self::authenticate(&state.pool, token).await
    }
}
