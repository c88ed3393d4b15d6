use livepen_preview::PreviewError;
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Project not found")]
    NotFound,

    #[error("Access to project forbidden")]
    Forbidden,

    #[error("Project service unreachable: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Project not found")]
    NotFound,

    #[error("Project rejected: {0}")]
    Validation(String),

    #[error("Project service unreachable: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Failed to fetch project data: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to save project: {0}")]
    Save(#[from] SaveError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error("Editor session is closed")]
    Closed,
}
