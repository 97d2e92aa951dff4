//! HTTP error type and RFC 7807 problem bodies

use aps_crm::DomainError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Problem details body returned for every error
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub method: Option<String>,
    pub path: Option<String>,
}

impl ProblemDetail {
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
            timestamp: Utc::now(),
            method: None,
            path: None,
        }
    }

    /// Generic title for a status with no more specific error
    pub fn default_title(status: StatusCode) -> &'static str {
        match status {
            StatusCode::BAD_REQUEST => "Malformed JSON request.",
            StatusCode::UNAUTHORIZED => "Unauthorized.",
            StatusCode::FORBIDDEN => "Access Denied.",
            StatusCode::NOT_FOUND => "Endpoint not found.",
            StatusCode::METHOD_NOT_ALLOWED => "HTTP method not supported for this request.",
            StatusCode::CONFLICT => "Data integrity violation.",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type.",
            StatusCode::UNPROCESSABLE_ENTITY => "Malformed JSON request.",
            StatusCode::PAYLOAD_TOO_LARGE => "Request body too large.",
            StatusCode::REQUEST_TIMEOUT => "Request timed out.",
            _ if status.is_server_error() => "An unexpected internal server error occurred.",
            _ => "Request failed.",
        }
    }
}

impl IntoResponse for ProblemDetail {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Entity not found.", e.to_string())
                }
                DomainError::Validation(_) => (
                    StatusCode::BAD_REQUEST,
                    "Illegal or inappropriate argument provided.",
                    e.to_string(),
                ),
                DomainError::InvalidCredentials => {
                    (StatusCode::BAD_REQUEST, "Wrong credentials.", e.to_string())
                }
                DomainError::Unauthorized(_) => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized.", e.to_string())
                }
                DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "Access Denied.", e.to_string()),
                DomainError::Conflict(_) => {
                    (StatusCode::CONFLICT, "Data integrity violation.", e.to_string())
                }
                DomainError::ExternalService(_) => {
                    (StatusCode::BAD_GATEWAY, "External service failure.", e.to_string())
                }
                DomainError::Repository(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected internal server error occurred.",
                    e.to_string(),
                ),
            },
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "Illegal or inappropriate argument provided.",
                reason.clone(),
            ),
            ApiError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized.", reason.clone())
            }
            ApiError::Forbidden(reason) => (StatusCode::FORBIDDEN, "Access Denied.", reason.clone()),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, "Entity not found.", reason.clone()),
            ApiError::Internal(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal server error occurred.",
                reason.clone(),
            ),
            ApiError::Anyhow(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal server error occurred.",
                e.to_string(),
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail) = self.parts();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", detail);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", detail);
        }
        ProblemDetail::new(status, title, detail).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_statuses() {
        assert_eq!(
            ApiError::from(DomainError::not_found("Volunteer", 3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DomainError::InvalidCredentials).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::Conflict("Email already registered.".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(DomainError::ExternalService("smtp down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_problem_body_shape() {
        let response = ApiError::from(DomainError::validation("Lista de ID-uri este goală."))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 400);
        assert_eq!(body["title"], "Illegal or inappropriate argument provided.");
        assert_eq!(body["detail"], "Lista de ID-uri este goală.");
    }
}
