use thiserror::Error;

use crate::error::DriverError;

/// Marks whether a failure is worth another attempt.
///
/// Transience is decided when the error is built, never by inspecting its
/// message. Types that do not override [`Transience::is_transient`] are
/// permanent.
pub trait Transience {
    fn is_transient(&self) -> bool {
        false
    }
}

/// Error returned by one attempt of a retried operation.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("Temporary Error: {0}")]
    Retriable(anyhow::Error),
    #[error("{0}")]
    Permanent(anyhow::Error),
}

impl AttemptError {
    pub fn retriable(err: impl Into<anyhow::Error>) -> Self {
        Self::Retriable(err.into())
    }

    pub fn permanent(err: impl Into<anyhow::Error>) -> Self {
        Self::Permanent(err.into())
    }
}

impl Transience for AttemptError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Retriable(_))
    }
}

impl From<anyhow::Error> for AttemptError {
    fn from(err: anyhow::Error) -> Self {
        Self::Permanent(err)
    }
}

impl From<DriverError> for AttemptError {
    fn from(err: DriverError) -> Self {
        Self::Permanent(err.into())
    }
}
