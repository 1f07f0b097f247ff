#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("{index} index unavailable: {reason}")]
    Unavailable { index: &'static str, reason: String },
}

impl IndexError {
    pub fn unavailable(index: &'static str, reason: impl Into<String>) -> Self {
        IndexError::Unavailable {
            index,
            reason: reason.into(),
        }
    }
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;
