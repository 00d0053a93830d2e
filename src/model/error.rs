use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown task state: {0:?}.")]
    UnknownState(String),
    #[error("Invalid date {0:?}, expecting YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Invalid page size {0}.")]
    InvalidPageSize(u32),
}
