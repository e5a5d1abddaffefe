//! Log severity derived from HTTP status codes.

use serde::Serialize;

/// Severity of a log record.
///
/// Names follow the Cloud Logging `LogSeverity` vocabulary, so
/// [`Severity::as_str`] can be written straight into a structured record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Normal operation (status below 400).
    Info,
    /// Client-side failure (status 400–499).
    Warning,
    /// Server-side failure (status 500 and above).
    Error,
}

impl Severity {
    /// Derive the severity of an HTTP exchange from its status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonic_report_core::Severity;
    ///
    /// assert_eq!(Severity::from_status(200), Severity::Info);
    /// assert_eq!(Severity::from_status(404), Severity::Warning);
    /// assert_eq!(Severity::from_status(503), Severity::Error);
    /// ```
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 500 {
            Self::Error
        } else if status >= 400 {
            Self::Warning
        } else {
            Self::Info
        }
    }

    /// Canonical upper-case name (`"INFO"`, `"WARNING"`, `"ERROR"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
