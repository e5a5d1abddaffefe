//! RPC failure payload attached to aborted exchanges.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::status_map::{grpc_code_name, grpc_to_http_status};

/// A failed RPC, as carried by an aborted HTTP exchange.
///
/// [`handle_error`](crate::handle_error) wraps every [`tonic::Status`] it
/// finds in a `RestError` before attaching it to the exchange. Its
/// [`Display`](std::fmt::Display) form (`NOT_FOUND: user not found`) is what
/// ends up in the request report's error list.
///
/// As a response it renders the
/// [Google API error model](https://cloud.google.com/apis/design/errors):
///
/// ```json
/// { "error": { "code": 404, "message": "user not found", "status": "NOT_FOUND" } }
/// ```
///
/// # Examples
///
/// ```
/// use tonic_report::RestError;
/// use axum::response::IntoResponse;
///
/// let err = RestError::new(tonic::Status::cancelled("client went away"));
/// assert_eq!(err.to_string(), "CANCELLED: client went away");
/// assert_eq!(err.into_response().status().as_u16(), 499);
/// ```
#[derive(Debug, Clone)]
pub struct RestError(tonic::Status);

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", grpc_code_name(self.0.code()), self.0.message())
    }
}

impl std::error::Error for RestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl RestError {
    /// Create a new `RestError` from a [`tonic::Status`].
    #[must_use]
    pub const fn new(status: tonic::Status) -> Self {
        Self(status)
    }

    /// Returns a reference to the underlying [`tonic::Status`].
    #[must_use]
    pub const fn status(&self) -> &tonic::Status {
        &self.0
    }

    /// Consumes the `RestError` and returns the underlying [`tonic::Status`].
    #[must_use]
    pub fn into_status(self) -> tonic::Status {
        self.0
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        grpc_to_http_status(self.0.code())
    }

    /// Google API error body, with `code` set to `http_status`.
    pub(crate) fn body(&self, http_status: StatusCode) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": http_status.as_u16(),
                "message": self.0.message(),
                "status": grpc_code_name(self.0.code()),
            }
        })
    }
}

impl From<tonic::Status> for RestError {
    fn from(status: tonic::Status) -> Self {
        Self(status)
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let http_status = self.http_status();
        (http_status, Json(self.body(http_status))).into_response()
    }
}
