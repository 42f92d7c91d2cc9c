use thiserror::Error;

#[derive(Debug, Error)]
pub enum DestructorError {
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
