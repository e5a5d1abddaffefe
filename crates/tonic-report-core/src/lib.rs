//! Logger and log-message contracts for the tonic-report ecosystem.
//!
//! A [`Message`] knows how to render itself twice: once for a human watching
//! a terminal and once as a structured map for log ingestion. A [`Logger`]
//! accepts a message at a [`Severity`] and decides which rendering to emit
//! and where.
//!
//! Two loggers ship with the crate:
//! - [`TracingLogger`] — forwards each message as a `tracing` event
//! - [`WriterLogger`] — writes terminal blocks or JSON lines to any
//!   [`std::io::Write`] (usually stdout)
//!
//! You normally depend on `tonic-report` instead, which re-exports these
//! types next to the request report middleware.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod logger;
mod message;
mod severity;

pub use logger::{Logger, RenderFormat, TracingLogger, WriterLogger};
pub use message::{Message, TERM_WIDTH};
pub use severity::Severity;
