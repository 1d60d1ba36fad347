use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("page count must be between 1 and {max}, got {got}")]
    InvalidPageCount { got: u32, max: u32 },
    #[error("invalid category {0:?}")]
    InvalidCategory(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
