use thiserror::Error;

use crate::cache::QueryKey;
use crate::model::TaskId;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no page loaded for {0:?}")]
    NotLoaded(QueryKey),
    #[error("task {0} is not on the current page")]
    UnknownTask(TaskId),
}
