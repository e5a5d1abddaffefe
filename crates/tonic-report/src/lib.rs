#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference
//!
//! # Types
//!
//! - [`ReportLayer`] — Middleware factory taking a [`Logger`] and a GCP project id
//! - [`Report`] — Renders one exchange for a terminal and for Cloud Logging
//! - [`handle_error`] — Aborts an exchange with the HTTP status of a failed RPC
//! - [`grpc_to_http_status`] — Maps gRPC status codes to HTTP status codes
//! - [`RestError`] — Google API error body for a [`tonic::Status`]
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! tonic-report = "0.1"
//! ```
//!
//! # Companion Crate
//!
//! | Crate                 | Purpose                       |
//! |-----------------------|-------------------------------|
//! | `tonic-report` (this) | Middleware + status mapping   |
//! | `tonic-report-core`   | Logger / message contracts    |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod runtime;

pub use error::{Error, Result};
pub use runtime::*;
pub use tonic_report_core::{
    Logger, Message, RenderFormat, Severity, TracingLogger, WriterLogger, TERM_WIDTH,
};
