use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

impl ProgressError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
