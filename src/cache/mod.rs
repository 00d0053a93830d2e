mod key;
mod store;

pub use key::QueryKey;
pub use store::{CacheEntry, ClientCache, Mutation, Provenance};

use crate::model::{Paginated, Task};

/// Cache of task list pages, one slot per query key.
pub type TaskCache = ClientCache<QueryKey, Paginated<Task>>;
