//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, AUTH_TOKEN_HEADER};

/// Rejects requests without a valid `X-Auth-Token` and stores the resolved
/// [`CurrentUser`] in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("Invalid or missing access token".to_string())
                .into_response()
        }
    };

    match CurrentUser::authenticate(&state.pool, &token).await {
        Ok(user) => {
            tracing::debug!(user_id = user.user_id, account_id = user.account_id, "Authenticated");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
