use thiserror::Error;

#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Document parsing failed: {0}")]
    DocumentParsing(String),

    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BumpError>;
