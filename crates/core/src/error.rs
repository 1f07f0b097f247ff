use thiserror::Error;
use twigscope_api::IndexError;

/// Outcome of a single resolution request that did not produce a result.
///
/// "No relationship" is never an error; resolvers return empty collections for that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{index} index unavailable: {reason}")]
    IndexUnavailable { index: &'static str, reason: String },
    #[error("resolution cancelled")]
    Cancelled,
}

impl ResolveError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResolveError::Cancelled)
    }
}

impl From<IndexError> for ResolveError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Unavailable { index, reason } => {
                ResolveError::IndexUnavailable { index, reason }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum TwigscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
    #[error("Template not found in corpus: {0}")]
    UnknownTemplate(String),
}
