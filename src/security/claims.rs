use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserClaims {
    pub sub: String, // Account id
    pub name: String,
    pub iat: u64,
    pub exp: u64, // Expiration time (UNIX timestamp)
}

/// The authenticated caller, inserted by the auth middleware.
#[derive(Clone, Debug)]
pub struct UserContext {
    pub account_id: u64,
    pub username: String,
    pub claims: UserClaims,
}

impl UserContext {
    /// Build a context from verified claims. Fails when `sub` is not an id.
    #[must_use]
    pub fn from_claims(claims: UserClaims) -> Option<Self> {
        let account_id = claims.sub.parse().ok()?;
        Some(Self {
            account_id,
            username: claims.name.clone(),
            claims,
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication credentials were not provided".into()))
    }
}
