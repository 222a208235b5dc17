//! Error types for buildcfg-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from buildcfg-parser, including header expression failures
    #[error(transparent)]
    Parse(#[from] buildcfg_parser::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The `--globals` file could not be read or is not a table of values
    #[error("Invalid globals file {path}: {message}")]
    GlobalsFile { path: String, message: String },

    /// The document could not be rendered in the requested format
    #[error("Failed to render {format}: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },

    /// A requested section or key does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn serialize(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            format,
            message: err.to_string(),
        }
    }

    /// Process exit status: 2 for lookups that found nothing, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::not_found("no section 'x'").exit_code(), 2);
        assert_eq!(CliError::user("bad define").exit_code(), 1);
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let inner = buildcfg_parser::Error::invalid_line("f.cfg", 3, "junk", "expected 'key = value'");
        let message = inner.to_string();
        assert_eq!(CliError::from(inner).to_string(), message);
    }
}
