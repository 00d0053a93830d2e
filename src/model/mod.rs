pub mod catalog;
pub mod correlation_id;
pub mod error;
pub mod filters;
pub mod page;
pub mod session;
pub mod task;

pub use catalog::{Category, OperationReply, Role, User, UserFilters, UserUpdate};
pub use correlation_id::CorrelationId;
pub use error::ModelError;
pub use filters::TaskFilters;
pub use page::Paginated;
pub use session::{Session, SessionUser};
pub use task::{CategoryRef, NewTask, Task, TaskId, TaskPatch, TaskState, UserRef};
