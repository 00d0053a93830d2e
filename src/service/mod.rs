mod categories;
mod roles;
mod tasks;
mod users;

use async_trait::async_trait;

pub use categories::CategoryService;
pub use roles::RoleService;
pub use tasks::HttpTaskService;
pub use users::UserService;

use crate::cache::QueryKey;
use crate::client::FetchError;
use crate::model::{NewTask, Paginated, Task, TaskId, TaskPatch};

/// Typed access to the task collection.
#[async_trait]
pub trait TaskQueryService: Send + Sync + 'static {
    /// Server-side filtered, sorted and paginated read for one query key.
    async fn list(&self, key: &QueryKey) -> Result<Paginated<Task>, FetchError>;
    async fn create(&self, data: &NewTask) -> Result<Task, FetchError>;
    /// Sparse update; fields absent from `patch` stay as they are.
    async fn partial_update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, FetchError>;
    /// Soft delete; later `list` calls no longer return `id`.
    async fn disable(&self, id: &TaskId) -> Result<(), FetchError>;
}
