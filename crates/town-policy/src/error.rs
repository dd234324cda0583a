use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown prompt id `{0}`")]
    UnknownPrompt(String),

    #[error("unknown policy `{0}` (expected `scripted` or `patrol`)")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
