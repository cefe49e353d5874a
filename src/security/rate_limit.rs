use std::fmt;
use std::num::NonZeroU32;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use nonzero_ext::nonzero;
use serde_json::json;

use crate::AppState;

/// Global token bucket.
///
/// Not keyed by client address; every request draws from one bucket.
pub struct AppRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    per_second: NonZeroU32,
    burst: NonZeroU32,
}

impl fmt::Debug for AppRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRateLimiter")
            .field("per_second", &self.per_second)
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

impl AppRateLimiter {
    /// Zero values fall back to one request per second and a burst of `per_second`.
    #[must_use]
    pub fn new(per_second: u32, burst: u32) -> Self {
        let per_second = NonZeroU32::new(per_second).unwrap_or(nonzero!(1u32));
        let burst = NonZeroU32::new(burst).unwrap_or(per_second);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst)),
            per_second,
            burst,
        }
    }

    /// Take one token. Returns `false` when the bucket is empty.
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Middleware to enforce rate limits
pub async fn rate_limit_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if state.config.resilience.rate_limit_enabled && !state.rate_limiter.check() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "too many requests, slow down" })),
        )
            .into_response();
    }
    next.run(req).await
}
