//! Logger capability and the two stock implementations.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use serde_json::Value;

use crate::{Message, Severity};

/// Sink that accepts a [`Message`] at a [`Severity`].
///
/// Delivery (synchronous, buffered, shipped elsewhere) is entirely up to the
/// implementation. Callers never observe delivery failures.
pub trait Logger: Send + Sync {
    /// Record `message` at `severity`.
    fn log(&self, severity: Severity, message: &dyn Message);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, severity: Severity, message: &dyn Message) {
        (**self).log(severity, message);
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, severity: Severity, message: &dyn Message) {
        (**self).log(severity, message);
    }
}

/// Which rendering of a [`Message`] a logger emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// [`Message::render_terminal`], for local development.
    #[default]
    Terminal,
    /// [`Message::render_structured`] as JSON, for log ingestion.
    Json,
}

/// Dispatch a `tracing` event at a runtime [`Severity`].
macro_rules! emit {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            Severity::Info => tracing::info!(target: "tonic_report", $($arg)+),
            Severity::Warning => tracing::warn!(target: "tonic_report", $($arg)+),
            Severity::Error => tracing::error!(target: "tonic_report", $($arg)+),
        }
    };
}

/// Logger that forwards every message as a `tracing` event.
///
/// The event level follows the severity (`WARNING` maps to `WARN`). In
/// [`RenderFormat::Json`] mode the structured map is attached as the
/// `record` field so a JSON subscriber can ship it unchanged.
///
/// ```
/// use tonic_report_core::{RenderFormat, TracingLogger};
///
/// let logger = TracingLogger::new(RenderFormat::Json);
/// assert_eq!(logger.format(), RenderFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger {
    format: RenderFormat,
}

impl TracingLogger {
    /// Create a logger emitting the given rendering.
    #[must_use]
    pub const fn new(format: RenderFormat) -> Self {
        Self { format }
    }

    /// The rendering this logger emits.
    #[must_use]
    pub const fn format(&self) -> RenderFormat {
        self.format
    }
}

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, message: &dyn Message) {
        match self.format {
            RenderFormat::Terminal => {
                let text = message.render_terminal();
                emit!(severity, "{}", text.trim_end());
            }
            RenderFormat::Json => {
                let record = Value::Object(message.render_structured());
                emit!(severity, record = %record, "request report");
            }
        }
    }
}

/// Logger that writes renderings to an [`io::Write`] sink.
///
/// In [`RenderFormat::Json`] mode each message becomes exactly one JSON line,
/// which is what Cloud Logging agents expect on stdout. A `severity` field is
/// added when the message does not provide one.
///
/// Write errors are reported through `tracing` and otherwise swallowed.
#[derive(Debug)]
pub struct WriterLogger<W> {
    writer: Mutex<W>,
    format: RenderFormat,
}

impl WriterLogger<io::Stdout> {
    /// Logger writing to the process stdout.
    #[must_use]
    pub fn stdout(format: RenderFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> WriterLogger<W> {
    /// Wrap an arbitrary writer.
    pub fn new(writer: W, format: RenderFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    /// Consume the logger and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn encode(&self, severity: Severity, message: &dyn Message) -> serde_json::Result<Vec<u8>> {
        match self.format {
            RenderFormat::Terminal => Ok(message.render_terminal().into_bytes()),
            RenderFormat::Json => {
                let mut record = message.render_structured();
                record
                    .entry("severity")
                    .or_insert_with(|| Value::from(severity.as_str()));
                let mut line = serde_json::to_vec(&record)?;
                line.push(b'\n');
                Ok(line)
            }
        }
    }
}

impl<W: Write + Send> Logger for WriterLogger<W> {
    fn log(&self, severity: Severity, message: &dyn Message) {
        let bytes = match self.encode(severity, message) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode log record");
                return;
            }
        };

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
            tracing::warn!(error = %err, "failed to write log record");
        }
    }
}
