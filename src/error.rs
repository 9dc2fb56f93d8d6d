use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures. Anything that goes wrong inside an analyzer is reported as a
/// [`SkipReason`](crate::insights::SkipReason) instead and never ends up here.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("No ticket file found (searched: {searched})")]
    NoTicketFile { searched: String },

    #[error("Unsupported file format '{extension}': {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Could not parse {}: {reason}", path.display())]
    ParseFailure { path: PathBuf, reason: String },

    #[error("Could not write insights to {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InsightsError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        InsightsError::ParseFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
