use thiserror::Error;

/// Errors surfaced by menu construction and the binary around it.
///
/// Everything except `ConfigRead`, `ConfigParse`, `Input` and `Program` is a
/// configuration error: a caller-supplied rule or override broke its
/// contract. Those are never retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("key chooser returned an invalid shortcut for '{word}': {reason}")]
    InvalidShortcut { word: String, reason: String },

    #[error("group rule returned an empty group name for target '{0}'")]
    EmptyGroupName(String),

    #[error("target order for group '{group}' did not return a permutation of its targets")]
    InvalidOrder { group: String },

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read target names: {0}")]
    Input(#[from] std::io::Error),

    #[error("terminal program failed: {0}")]
    Program(String),
}

impl Error {
    /// True when the error comes from a caller-supplied rule or override.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidShortcut { .. }
                | Self::EmptyGroupName(_)
                | Self::InvalidOrder { .. }
                | Self::Pattern { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
