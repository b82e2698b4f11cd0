/// Convenience result type used across the replay pipeline.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Top-level error taxonomy used by loader, adapter and session APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A trace line that is not valid JSON. `line` is 1-based.
    #[error("trace parse error at line {line}: {source}")]
    TraceParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A trace line that is valid JSON but does not describe a take.
    #[error("trace schema error at line {line}: {message}")]
    TraceSchema { line: usize, message: String },

    /// A vegetation type code with no catalog entry.
    #[error("lookup error: unknown tree type '{code}'")]
    UnknownTreeType { code: String },

    /// A known type code whose template is not among the imported objects.
    #[error("lookup error: tree type '{code}' has no imported template '{basename}'")]
    MissingTemplate { code: String, basename: String },

    #[error("take {take} out of range (trace has {len} takes)")]
    TakeOutOfRange { take: usize, len: usize },

    /// Failure reported by the scene adapter.
    #[error("scene error: {0}")]
    Scene(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReplayError {
    /// Build a [`ReplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn schema(line: usize, msg: impl Into<String>) -> Self {
        Self::TraceSchema {
            line,
            message: msg.into(),
        }
    }

    pub fn unknown_tree_type(code: impl Into<String>) -> Self {
        Self::UnknownTreeType { code: code.into() }
    }

    /// Build a [`ReplayError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
