use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("Cannot summarize an empty set of records")]
    EmptyInput,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Figure supports at most {max} panels, {requested} requested")]
    TooManyPanels { requested: usize, max: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
