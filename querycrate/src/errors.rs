//! # Errors
//!
//! Two kinds of failure exist:
//!
//! - [`ConfigError`] is returned while compiling a model. It means the model or
//!   configuration is wrong and the application should refuse to start.
//! - [`ParseError`] is returned while translating a request. It names the
//!   offending parameter and is meant to be shown to the client, usually as a
//!   `400 Bad Request`.
//!
//! With the `axum` feature, [`ParseError`] implements `IntoResponse`:
//!
//! ```rust,ignore
//! async fn list_pets(
//!     State(builder): State<Arc<QueryBuilder>>,
//!     params: QueryParams,
//! ) -> Result<Json<DbQuery>, ParseError> {
//!     Ok(Json(builder.parse(&params)?))
//! }
//! ```
//!
//! Rejections are logged with `tracing` at debug level.

use thiserror::Error;

/// Misconfiguration detected while compiling a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("query: 'model' is a required field")]
    MissingModel,

    #[error("query: could not use field {field} ({type_name}) with query filter")]
    UnsupportedFieldType { field: String, type_name: String },

    #[error("query: invalid search operator '{0}', expected AND or OR")]
    InvalidSearchOperator(String),
}

/// A rejected request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid value('{value}') for key '{key}'")]
    InvalidNumber { key: String, value: String },

    #[error("value for key '{key}' must be greater than or equal to {min}")]
    BelowMinimum { key: String, min: i64 },

    #[error("value for key '{key}' must be less than or equal to {max}")]
    AboveMaximum { key: String, max: u64 },

    #[error("missing sort parameter")]
    MissingSort,

    #[error("invalid sort parameter '{0}'")]
    InvalidSort(String),

    #[error("invalid parameter for key '{0}'")]
    InvalidFilter(String),
}

impl ParseError {
    /// The query-string key the error refers to, when there is one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidNumber { key, .. }
            | Self::BelowMinimum { key, .. }
            | Self::AboveMaximum { key, .. }
            | Self::InvalidFilter(key) => Some(key),
            Self::MissingSort | Self::InvalidSort(_) => None,
        }
    }
}

#[cfg(feature = "axum")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    use super::ParseError;

    /// Error response sent to clients.
    #[derive(Serialize)]
    struct ErrorResponse {
        error: String,
    }

    impl IntoResponse for ParseError {
        fn into_response(self) -> Response {
            let error = self.to_string();
            tracing::debug!(
                error = %error,
                key = self.key().unwrap_or_default(),
                status = %StatusCode::BAD_REQUEST,
                "rejected query parameters"
            );
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
        }
    }
}
