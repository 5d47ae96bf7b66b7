//! Error types
//!
//! Every failure a read can hit maps onto one variant of [`Error`]. State
//! writes are the exception to fail-fast: they are collected into a
//! [`MultiError`] so that all fields are attempted before anything is reported.

use std::fmt;

/// Result alias used across the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Service client could not be built (unknown service, bad region or endpoint)
    #[error("{0}")]
    ClientBuild(String),

    /// Request could not be built, sent, or was answered with a failure status
    #[error("{message}")]
    Request {
        message: String,
        status: Option<u16>,
    },

    /// Response body or a field inside it could not be decoded
    #[error("{0}")]
    Decode(String),

    /// Query parameters rejected before any request was sent
    #[error("invalid query parameters: {0}")]
    Input(String),

    /// One or more state writes failed
    #[error(transparent)]
    State(#[from] MultiError),

    /// Operation context wrapped around another error
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn request(message: impl Into<String>) -> Self {
        Error::Request {
            message: message.into(),
            status: None,
        }
    }

    /// Wrap this error with a description of the operation that failed
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status of a failed request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Error::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// Attach operation context to a fallible result
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }
}

/// A single failed state write
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetError {
    #[error("invalid address to set: {field:?}")]
    UnknownField { field: String },

    #[error("{field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: String,
    },
}

/// Aggregates independent failures and reports them as one
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MultiError {
    errors: Vec<SetError>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one operation; successes are dropped
    pub fn append(mut self, result: std::result::Result<(), SetError>) -> Self {
        if let Err(e) = result {
            self.errors.push(e);
        }
        self
    }

    pub fn errors(&self) -> &[SetError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing failed, otherwise the whole collection
    pub fn into_result(self) -> std::result::Result<(), MultiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<std::result::Result<(), SetError>> for MultiError {
    fn from_iter<I: IntoIterator<Item = std::result::Result<(), SetError>>>(iter: I) -> Self {
        iter.into_iter().fold(MultiError::new(), MultiError::append)
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            return write!(f, "1 error occurred:\n\t* {}", self.errors[0]);
        }
        write!(f, "{} errors occurred:", self.errors.len())?;
        for e in &self.errors {
            write!(f, "\n\t* {}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

/// Format an error for display
/// Maps well-known failure statuses to short, actionable messages
pub fn format_error(error: &Error) -> String {
    match error.status() {
        Some(401) => return "Authentication failed. Check the configured auth token.".to_string(),
        Some(403) => return "Permission denied. Check your IAM permissions.".to_string(),
        Some(404) => return "Resource not found.".to_string(),
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => return "Invalid request. Check your parameters.".to_string(),
        Some(500) | Some(503) => {
            return "Workspace service temporarily unavailable. Please try again.".to_string()
        }
        _ => {}
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
