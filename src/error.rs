use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Unknown metric match mode '{0}' (expected exact, contains, contains_case_sensitive or regex)")]
    InvalidMatchMode(String),

    #[error("Invalid match expression '{pattern}' while {operation}: {source}")]
    InvalidMatchExpression {
        pattern: String,
        operation: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed {kind} {id}: {reason}")]
    MalformedRecord {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("{kind} '{identifier}' is not available")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },
}

impl CheckError {
    pub fn malformed(kind: &'static str, id: impl ToString, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            kind,
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, identifier: impl ToString) -> Self {
        Self::NotFound {
            kind,
            identifier: identifier.to_string(),
        }
    }

    /// Errors that only invalidate a single widget, rule or metric.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::InvalidMatchExpression { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
