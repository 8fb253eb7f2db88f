use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutolinkError>;

#[derive(Debug, Error)]
pub enum AutolinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Name retrieval failed: {0}")]
    Retrieval(String),

    #[error("No editable surface: {0}")]
    NoEditableSurface(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for AutolinkError {
    fn from(e: serde_json::Error) -> Self {
        AutolinkError::Serialization(e.to_string())
    }
}
