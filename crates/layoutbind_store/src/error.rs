//! Error types for log and artifact operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing logs and artifacts.
///
/// Reads done on behalf of the resolver are fail-safe: these errors become a
/// fallback to a full build or a skipped artifact rather than a failed build.
/// Writes are not: a log that cannot be persisted is reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A log or artifact file is not valid JSON for the expected schema.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The file was written with a schema version this build does not understand.
    #[error("unsupported schema version in {path}: expected at most {expected}, got {actual}")]
    SchemaVersion {
        /// The file path.
        path: PathBuf,
        /// The newest version this build can read.
        expected: u32,
        /// The version found in the file.
        actual: u32,
    },

    /// A file in an artifact folder does not follow the artifact naming schema.
    #[error("not a binding class artifact: {path}")]
    InvalidArtifactName {
        /// The offending file.
        path: PathBuf,
    },

    /// A serialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = StoreError::io(
            "/tmp/binder-log/binder_log.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("binder_log.json"));
    }

    #[test]
    fn parse_display() {
        let err = StoreError::Parse {
            path: PathBuf::from("log.json"),
            reason: "unexpected EOF".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("log.json"));
        assert!(msg.contains("unexpected EOF"));
    }

    #[test]
    fn schema_version_display() {
        let err = StoreError::SchemaVersion {
            path: PathBuf::from("new.json"),
            expected: 1,
            actual: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected at most 1"));
        assert!(msg.contains("got 7"));
    }

    #[test]
    fn invalid_artifact_name_display() {
        let err = StoreError::InvalidArtifactName {
            path: PathBuf::from("deps/readme.txt"),
        };
        assert!(err.to_string().contains("readme.txt"));
    }

    #[test]
    fn serialization_display() {
        let err = StoreError::Serialization {
            reason: "key must be a string".to_string(),
        };
        assert!(err.to_string().contains("key must be a string"));
    }
}
