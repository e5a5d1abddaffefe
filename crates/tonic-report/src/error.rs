//! Typed error enum for the `tonic-report` library API.

/// Errors produced by `tonic-report` library operations.
///
/// Request handling itself never fails; these only come out of loading
/// configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Config file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for [`ReportConfig`](crate::ReportConfig).
    #[error("invalid report config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `Error` is `Send + Sync`.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    };

    #[test]
    fn yaml_error_is_prefixed() {
        let err: Error = serde_yaml_ng::from_str::<Vec<u8>>("[[[")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("invalid report config: "));
    }
}
