//! Error types for buildcfg-parser

/// Error raised by a caller-supplied expression evaluator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for parse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line needs a section but none is open, or a header line is malformed.
    #[error("{label}, line {lineno}: missing or invalid section header ({reason}): {line:?}")]
    MissingSectionHeader {
        label: String,
        lineno: usize,
        line: String,
        reason: String,
    },

    /// A line inside an active section that is neither a key nor a continuation.
    #[error("{label}, line {lineno}: invalid line ({reason}): {line:?}")]
    InvalidLine {
        label: String,
        lineno: usize,
        line: String,
        reason: String,
    },

    /// Failure raised by the expression evaluator, passed through as-is.
    #[error(transparent)]
    Expression(BoxError),

    #[error("I/O error reading {label}: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn missing_section_header(
        label: impl Into<String>,
        lineno: usize,
        line: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MissingSectionHeader {
            label: label.into(),
            lineno,
            line: line.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_line(
        label: impl Into<String>,
        lineno: usize,
        line: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidLine {
            label: label.into(),
            lineno,
            line: line.into(),
            reason: reason.into(),
        }
    }

    pub fn io(label: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            label: label.into(),
            source,
        }
    }

    /// True for the structural category: malformed headers and stray lines.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingSectionHeader { .. } | Self::InvalidLine { .. }
        )
    }

    /// 1-based line number for structural errors.
    pub fn lineno(&self) -> Option<usize> {
        match self {
            Self::MissingSectionHeader { lineno, .. } | Self::InvalidLine { lineno, .. } => {
                Some(*lineno)
            }
            _ => None,
        }
    }
}
