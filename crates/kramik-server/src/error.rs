use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kramik_store::StorageError;
use serde::Serialize;
use snafu::Snafu;
use tracing::{debug, warn};

use crate::LOG_TARGET;
use crate::routes::AppJson;

/// Render an error and its source chain on one line for the logs.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(err) = source {
        out.push_str(": ");
        out.push_str(&err.to_string());
        source = err.source();
    }
    out
}

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Not authorized to perform this operation"))]
    Unauthorized,
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Invalid password"))]
    WrongPassword,
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Product not found"))]
    ProductNotFound,
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("User {login:?} is not registered"))]
    UserNotFound {
        login: String,
    },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("{message}"))]
    BadRequest {
        message: String,
    },
    #[snafu(display("{source}"))]
    InvalidBody {
        source: JsonRejection,
    },
    #[snafu(transparent)]
    Storage {
        source: StorageError,
    },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("{message}"))]
    Internal {
        message: String,
    },
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl From<JsonRejection> for RequestError {
    fn from(source: JsonRejection) -> Self {
        Self::InvalidBody { source }
    }
}

// How error responses are serialized on the wire.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match &self {
            RequestError::Unauthorized | RequestError::WrongPassword => StatusCode::UNAUTHORIZED,
            RequestError::ProductNotFound | RequestError::UserNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RequestError::BadRequest { .. } | RequestError::InvalidBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            RequestError::Storage { .. } | RequestError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            warn!(
                target: LOG_TARGET,
                err = %error_chain(&self),
                "Request failed"
            );
        } else {
            debug!(
                target: LOG_TARGET,
                err = %self,
                "Request rejected"
            );
        }

        (
            status,
            AppJson(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
