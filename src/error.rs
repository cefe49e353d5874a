//! HTTP error type shared by the JSON API.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::FieldIssue;
use crate::editor::{EditorError, FieldError, FormError, SelectionError};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("validation failed")]
    Validation(Vec<FieldIssue>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldIssue>,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fail with `Validation` when `issues` is non-empty.
    pub fn check(issues: Vec<FieldIssue>) -> ApiResult<()> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(issues))
        }
    }

    /// One-line message suitable for an inline HTML fragment.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Validation(issues) => issues
                .iter()
                .map(|i| format!("{}: {}", i.field, i.message))
                .collect::<Vec<_>>()
                .join("; "),
            Self::Internal(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(err) = &self {
            error!(name: "api.internal_error", error = ?err, "Unhandled error");
        }
        let error = self.summary();
        let fields = match self {
            Self::Validation(issues) => issues,
            _ => Vec::new(),
        };
        let body = ErrorBody { error, fields };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Invalid(msg) => Self::BadRequest(msg),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(format!("failed to read upload: {}", err.body_text()))
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::Validation(
            err.fields()
                .iter()
                .map(|field| FieldIssue::new(*field, "this field is required"))
                .collect(),
        )
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        let field = match &err {
            FieldError::UnknownField(field) | FieldError::Invalid { field, .. } => field.clone(),
        };
        Self::Validation(vec![FieldIssue::new(field, err.to_string())])
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NotFound(_) => Self::NotFound(err.to_string()),
            EditorError::Field(field) => field.into(),
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        Self::Validation(vec![FieldIssue::new("platform_ids", err.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(StoreError::NotFound("session")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("taken".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Invalid("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_fields_become_field_issues() {
        let err = ApiError::from(FormError::Missing(vec!["username", "password"]));
        let ApiError::Validation(issues) = &err else {
            panic!("expected validation error");
        };
        assert_eq!(issues.len(), 2);
        assert_eq!(err.summary(), "username: this field is required; password: this field is required");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::Internal(anyhow::anyhow!("hash backend exploded"));
        assert!(!err.summary().contains("exploded"));
    }
}
