//! gRPC → HTTP status code mapping.

use axum::http::StatusCode;

/// Non-standard "client closed request" status, used for `CANCELLED`.
///
/// No registered HTTP status describes a caller that gave up, so this follows
/// the nginx convention.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Return the canonical `SCREAMING_SNAKE_CASE` name for a gRPC status code.
///
/// Follows the [gRPC status code names](https://grpc.github.io/grpc/core/md_doc_statuscodes.html).
///
/// # Examples
///
/// ```
/// use tonic_report::grpc_code_name;
///
/// assert_eq!(grpc_code_name(tonic::Code::NotFound), "NOT_FOUND");
/// assert_eq!(grpc_code_name(tonic::Code::InvalidArgument), "INVALID_ARGUMENT");
/// ```
#[must_use]
pub fn grpc_code_name(code: tonic::Code) -> &'static str {
    match code {
        tonic::Code::Ok => "OK",
        tonic::Code::Cancelled => "CANCELLED",
        tonic::Code::Unknown => "UNKNOWN",
        tonic::Code::InvalidArgument => "INVALID_ARGUMENT",
        tonic::Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
        tonic::Code::NotFound => "NOT_FOUND",
        tonic::Code::AlreadyExists => "ALREADY_EXISTS",
        tonic::Code::PermissionDenied => "PERMISSION_DENIED",
        tonic::Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
        tonic::Code::FailedPrecondition => "FAILED_PRECONDITION",
        tonic::Code::Aborted => "ABORTED",
        tonic::Code::OutOfRange => "OUT_OF_RANGE",
        tonic::Code::Unimplemented => "UNIMPLEMENTED",
        tonic::Code::Internal => "INTERNAL",
        tonic::Code::Unavailable => "UNAVAILABLE",
        tonic::Code::DataLoss => "DATA_LOSS",
        tonic::Code::Unauthenticated => "UNAUTHENTICATED",
    }
}

/// Map a gRPC status code to a numeric HTTP status.
///
/// Codes without an explicit entry (`UNKNOWN`, `ABORTED`, `INTERNAL`,
/// `DATA_LOSS`) fall back to `500`. `CANCELLED` maps to
/// [`CLIENT_CLOSED_REQUEST`].
///
/// # Examples
///
/// ```
/// use tonic_report::grpc_to_http_code;
///
/// assert_eq!(grpc_to_http_code(tonic::Code::NotFound), 404);
/// assert_eq!(grpc_to_http_code(tonic::Code::Cancelled), 499);
/// assert_eq!(grpc_to_http_code(tonic::Code::DataLoss), 500);
/// ```
#[must_use]
pub fn grpc_to_http_code(code: tonic::Code) -> u16 {
    match code {
        tonic::Code::Ok => StatusCode::OK.as_u16(),
        tonic::Code::Cancelled => CLIENT_CLOSED_REQUEST,
        tonic::Code::InvalidArgument => StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
        tonic::Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT.as_u16(),
        tonic::Code::NotFound => StatusCode::NOT_FOUND.as_u16(),
        tonic::Code::AlreadyExists => StatusCode::CONFLICT.as_u16(),
        tonic::Code::PermissionDenied => StatusCode::FORBIDDEN.as_u16(),
        tonic::Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS.as_u16(),
        tonic::Code::FailedPrecondition | tonic::Code::OutOfRange => {
            StatusCode::BAD_REQUEST.as_u16()
        }
        tonic::Code::Unimplemented => StatusCode::NOT_IMPLEMENTED.as_u16(),
        tonic::Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE.as_u16(),
        tonic::Code::Unauthenticated => StatusCode::UNAUTHORIZED.as_u16(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
    }
}

/// Map a gRPC status code to a typed HTTP [`StatusCode`].
///
/// Same table as [`grpc_to_http_code`].
///
/// # Examples
///
/// ```
/// use tonic_report::grpc_to_http_status;
///
/// assert_eq!(grpc_to_http_status(tonic::Code::NotFound), axum::http::StatusCode::NOT_FOUND);
/// assert_eq!(grpc_to_http_status(tonic::Code::InvalidArgument).as_u16(), 422);
/// ```
#[must_use]
pub fn grpc_to_http_status(code: tonic::Code) -> StatusCode {
    StatusCode::from_u16(grpc_to_http_code(code)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
