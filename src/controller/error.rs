use thiserror::Error;

use crate::client::FetchError;
use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] ModelError),
}
