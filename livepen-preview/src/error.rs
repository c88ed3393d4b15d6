use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Preview unavailable: {reason}")]
    SandboxUnavailable { reason: String },

    #[error("Document synthesis failed: {0}")]
    Synthesis(String),

    #[error("No tokio runtime is running; the preview needs one to schedule rebuilds")]
    NoRuntime,

    #[error("Invalid preview configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        PreviewError::SandboxUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<serde_yaml::Error> for PreviewError {
    fn from(err: serde_yaml::Error) -> Self {
        PreviewError::Config(err.to_string())
    }
}
