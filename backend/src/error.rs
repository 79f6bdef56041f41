//! The error type every handler returns, and its mapping to HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::contact::RowRejection;
use common::responses::{ErrorBody, ErrorDetail, FieldError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body or fields.
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("{0}")]
    NotFound(String),

    /// The request is well formed but the system state forbids it
    /// (no agents yet, no valid rows in the upload).
    #[error("{message}")]
    Precondition {
        message: String,
        rejections: Vec<RowRejection>,
    },

    /// Upload stream unreadable or not an accepted file type.
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Return type for handlers that build their response with `?`.
pub type ResponseResult = Result<HttpResponse, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        ApiError::Precondition {
            message: message.into(),
            rejections: Vec::new(),
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation { message, fields } => ErrorBody {
                message: message.clone(),
                errors: fields.iter().cloned().map(ErrorDetail::Field).collect(),
            },
            ApiError::Precondition {
                message,
                rejections,
            } => ErrorBody {
                message: message.clone(),
                errors: rejections.iter().cloned().map(ErrorDetail::Row).collect(),
            },
            ApiError::Persistence(_) => ErrorBody {
                message: "Database error".to_string(),
                errors: Vec::new(),
            },
            other => ErrorBody {
                message: other.to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(format!("I/O error: {}", e))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::Precondition { .. } | ApiError::Parse(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use common::model::contact::ContactError;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_lists_field_errors() {
        let (status, json) = body_json(ApiError::Validation {
            message: "Validation failed".into(),
            fields: vec![FieldError {
                field: "email".into(),
                message: "Please enter a valid email".into(),
            }],
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "email");
    }

    #[actix_web::test]
    async fn precondition_carries_row_rejections() {
        let (status, json) = body_json(ApiError::Precondition {
            message: "No valid data found in CSV file".into(),
            rejections: vec![RowRejection::new(
                1,
                ContactError::InvalidPhoneFormat,
                Some("abc"),
            )],
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["reason"], "invalid_phone_format");
        assert_eq!(json["errors"][0]["row"], 1);
    }

    #[actix_web::test]
    async fn persistence_details_stay_private() {
        let (status, json) =
            body_json(ApiError::Persistence(rusqlite::Error::QueryReturnedNoRows)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Database error");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::NotFound("Agent not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("admin only".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Parse("bad csv".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
