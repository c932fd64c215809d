use notewise_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("invalid session configuration: {0}")]
    Configuration(String),
    #[error("targets cannot change after the first attempt")]
    SessionStarted,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl TutorError {
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }
}
