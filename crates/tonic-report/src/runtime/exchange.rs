//! Aborting HTTP exchanges on RPC failures.

use std::error::Error as StdError;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::BoxError;

use super::error::RestError;

/// Handler-side capability over an in-flight HTTP exchange.
///
/// Aborting terminates the exchange at a status and records the error so the
/// request report can list it. Implement this for your own HTTP layer, or use
/// [`HttpExchange`] with Axum.
pub trait Exchange {
    /// Current response status.
    fn status(&self) -> StatusCode;

    /// Whether [`abort_with_error`](Exchange::abort_with_error) was called.
    fn is_aborted(&self) -> bool;

    /// Terminate the exchange with `status`, attaching `error` for reporting.
    fn abort_with_error(&mut self, status: StatusCode, error: BoxError);
}

/// Error messages a handler attached to its response.
///
/// [`HttpExchange`] inserts this as a response extension; the
/// [`ReportLayer`](crate::ReportLayer) reads it back into the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedErrors(pub Vec<String>);

impl ReportedErrors {
    /// The messages, in the order they were attached.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// [`Exchange`] for Axum handlers.
///
/// Starts at `200 OK`. Turn it into the handler's response with
/// [`IntoResponse`]; the response carries the aborted status, a
/// [`ReportedErrors`] extension, and, for RPC failures, the Google API error
/// JSON body produced by [`RestError`].
///
/// # Examples
///
/// ```
/// use axum::response::IntoResponse;
/// use tonic_report::{handle_error, HttpExchange};
///
/// let mut exchange = HttpExchange::new();
/// assert!(handle_error(&mut exchange, Some(tonic::Status::not_found("no user"))));
///
/// let response = exchange.into_response();
/// assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Default)]
pub struct HttpExchange {
    status: StatusCode,
    aborted: bool,
    errors: Vec<String>,
    failure: Option<BoxError>,
}

impl HttpExchange {
    /// A fresh, non-aborted exchange.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for the report without aborting.
    pub fn push_error(&mut self, error: impl std::fmt::Display) {
        self.errors.push(error.to_string());
    }

    /// Errors recorded so far, in order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Exchange for HttpExchange {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn is_aborted(&self) -> bool {
        self.aborted
    }

    fn abort_with_error(&mut self, status: StatusCode, error: BoxError) {
        self.status = status;
        self.aborted = true;
        self.errors.push(error.to_string());
        self.failure = Some(error);
    }
}

impl IntoResponse for HttpExchange {
    fn into_response(self) -> Response {
        let rest = self
            .failure
            .as_deref()
            .and_then(|err| err.downcast_ref::<RestError>());

        let mut response = match rest {
            Some(rest) => (self.status, Json(rest.body(self.status))).into_response(),
            None => self.status.into_response(),
        };

        if !self.errors.is_empty() {
            response
                .extensions_mut()
                .insert(ReportedErrors(self.errors));
        }
        response
    }
}

/// Find a [`tonic::Status`] in `err` or anywhere in its source chain.
///
/// # Examples
///
/// ```
/// use tonic_report::{rpc_status, RestError};
///
/// let wrapped = RestError::new(tonic::Status::unavailable("down"));
/// assert_eq!(rpc_status(&wrapped).unwrap().code(), tonic::Code::Unavailable);
///
/// let plain = std::io::Error::other("disk full");
/// assert!(rpc_status(&plain).is_none());
/// ```
#[must_use]
pub fn rpc_status<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a tonic::Status> {
    std::iter::successors(Some(err), |&err| err.source())
        .find_map(|err| err.downcast_ref::<tonic::Status>())
}

/// Abort `exchange` according to the outcome of a downstream RPC call.
///
/// - `None` → returns `false`; the exchange is untouched.
/// - An error carrying a [`tonic::Status`] (see [`rpc_status`]) → aborts with
///   the mapped HTTP status and a [`RestError`] payload.
/// - Any other error → aborts with `500` and the original error.
///
/// Returns `true` whenever the exchange was aborted; the handler must not do
/// further work on it.
///
/// # Examples
///
/// ```
/// use tonic_report::{handle_error, Exchange, HttpExchange};
///
/// let mut exchange = HttpExchange::new();
/// assert!(!handle_error(&mut exchange, None::<tonic::Status>));
/// assert!(!exchange.is_aborted());
///
/// assert!(handle_error(&mut exchange, Some("connection reset")));
/// assert_eq!(exchange.status().as_u16(), 500);
/// ```
pub fn handle_error<X, E>(exchange: &mut X, err: Option<E>) -> bool
where
    X: Exchange + ?Sized,
    E: Into<BoxError>,
{
    let Some(err) = err else {
        return false;
    };

    let err: BoxError = err.into();
    match rpc_status(&*err).cloned() {
        Some(status) => {
            let rest = RestError::new(status);
            exchange.abort_with_error(rest.http_status(), Box::new(rest));
        }
        None => exchange.abort_with_error(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
    true
}
