//! Runtime types for request reporting and RPC failure translation.
//!
//! - [`ReportLayer`] — Tower middleware logging a [`Report`] per request
//! - [`Report`] — Terminal and structured rendering of one exchange
//! - [`handle_error`] — Aborts an [`Exchange`] with the HTTP status of a failed RPC
//! - [`grpc_to_http_status`] — Maps gRPC status codes to HTTP status codes
//! - [`grpc_code_name`] — Returns the canonical `SCREAMING_SNAKE_CASE` name for a gRPC code

mod config;
mod error;
mod exchange;
mod layer;
mod report;
mod request;
mod snapshot;
mod status_map;

pub use config::{ColorChoice, ReportConfig};
pub use error::RestError;
pub use exchange::{handle_error, rpc_status, Exchange, HttpExchange, ReportedErrors};
pub use layer::{ReportLayer, ReportService};
pub use report::{Metrics, Report, TRACE_FIELD};
pub use request::{client_ip, CLIENT_IP_HEADERS, TRACE_CONTEXT_HEADER};
pub use snapshot::{parse_query, QueryParams, RequestSnapshot, Snapshot};
pub use status_map::{
    grpc_code_name, grpc_to_http_code, grpc_to_http_status, CLIENT_CLOSED_REQUEST,
};
