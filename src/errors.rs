//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. The error maps onto an HTTP
//! status code and a sanitized JSON body:
//!
//! ```json
//! {"error": "Validation failed", "details": ["pageSize must be at least 1"]}
//! ```
//!
//! Storage errors are classified when converted from [`DbErr`]:
//! - `DbErr::RecordNotFound` / `DbErr::RecordNotUpdated` -> 404 Not Found
//! - foreign-key or unique constraint violations -> 409 Conflict
//! - everything else -> 500, with the internal error logged through `tracing`
//!   and never sent to the client.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;

/// Failure of a request, rendered as a status code and a JSON error body
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - the referenced identity does not exist
    NotFound {
        /// Singular resource name, `author` or `book`
        resource: String,
        /// Identity that was looked up, when known
        id: Option<String>,
    },

    /// 400 Bad Request - malformed or out-of-constraint input
    ValidationFailed {
        /// One message per offending field
        errors: Vec<String>,
    },

    /// 409 Conflict - foreign-key or uniqueness violation
    Conflict {
        message: String,
    },

    /// 500 - any storage error that is not a constraint violation
    Database {
        message: String,
        /// Logged, never serialized
        internal: DbErr,
    },

    /// 500 - broken invariant outside the database driver
    Internal {
        message: String,
        /// Logged, never serialized
        internal: Option<String>,
    },
}

impl ApiError {
    /// 404 for `resource` with the given id
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 validation error from a list of messages
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::validation_failed(vec![
    ///     "currentPage must be at least 1".to_string(),
    /// ]));
    /// ```
    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// 409 with a client-visible message
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 500 wrapping a driver error; the client only sees a generic message
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// 500 with optional details for the log
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
            Self::Conflict { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Body of every error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Convert `SeaORM` `DbErr` to `ApiError`
///
/// Constraint violations are detected through [`DbErr::sql_err`], which
/// understands the error codes of every enabled backend.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            DbErr::RecordNotUpdated => Self::NotFound {
                resource: "Resource".to_string(),
                id: None,
            },
            _ => match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Self::conflict("Foreign key constraint violated")
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => Self::conflict("Duplicate entry"),
                _ => Self::database(err),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_failed(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation_failed(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation_failed(vec![rejection.body_text()])
    }
}
