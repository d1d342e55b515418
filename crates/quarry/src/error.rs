//! Error types for the adapter.

use thiserror::Error;

/// Errors raised while mapping, generating, or executing queries.
#[derive(Debug, Error)]
pub enum Error {
    /// Attribute discovery or get/set failure, a missing primary key, or an
    /// empty result set where exactly one row is required.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// Chain or entity state that cannot be compiled into SQL.
    #[error("generation error: {0}")]
    Generation(String),

    /// An entity rejected by its own validation, before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure surfaced by the connection collaborator or the store itself.
    /// The original cause is preserved as the error source.
    #[error("execution error: {context}")]
    Execution {
        /// What the adapter was doing when the driver failed.
        context: String,
        /// The driver error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wraps a driver error with a contextual message.
    #[must_use]
    pub fn execution(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Execution {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_preserves_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::execution("failed to acquire connection", cause);
        assert_eq!(
            err.to_string(),
            "execution error: failed to acquire connection"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_mapping_display() {
        let err = Error::Mapping(String::from("no primary key on `User`"));
        assert_eq!(err.to_string(), "mapping error: no primary key on `User`");
    }
}
