use thiserror::Error;

/// Every failure the tally compiler and model assembler can report.
///
/// All variants are raised synchronously while compiling or building; none of
/// them is retried internally.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported target kind: {0}")]
    TypeKind(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Geometry engine failure: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
