use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::claims::UserContext;
use crate::AppState;
use crate::error::ApiError;

/// Cookie set by the HTML login form.
pub const TOKEN_COOKIE: &str = "applypilot_token";

/// Resolve the caller from the request.
///
/// An `Authorization` header must carry a valid bearer token for an existing
/// account or the request is rejected. Without the header, a valid token
/// cookie is used when present; a stale cookie is ignored. Handlers that need a caller extract
/// [`UserContext`], which rejects anonymous requests.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let context = match caller(&state, request.headers()) {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };
    if let Some(context) = context {
        request.extensions_mut().insert(context);
    }
    next.run(request).await
}

fn caller(state: &AppState, headers: &HeaderMap) -> Result<Option<UserContext>, ApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".into()))?;
        let context = state.tokens.verify(token.trim()).map_err(|err| {
            debug!(name: "auth.token_rejected", error = %err, "Bearer token rejected");
            ApiError::Unauthorized(err.to_string())
        })?;
        if !account_exists(state, &context) {
            debug!(name: "auth.account_missing", account_id = context.account_id, "Token for a deleted account");
            return Err(ApiError::Unauthorized("account no longer exists".into()));
        }
        return Ok(Some(context));
    }

    let jar = CookieJar::from_headers(headers);
    Ok(jar
        .get(TOKEN_COOKIE)
        .and_then(|cookie| state.tokens.verify(cookie.value()).ok())
        .filter(|context| account_exists(state, context)))
}

fn account_exists(state: &AppState, context: &UserContext) -> bool {
    state.store.account(context.account_id).is_some()
}
