//! In-memory task server used by the controller and synchronizer tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::cache::QueryKey;
use crate::client::FetchError;
use crate::model::{NewTask, Paginated, Task, TaskId, TaskPatch, TaskState};
use crate::service::TaskQueryService;

pub(crate) use crate::model::page::testdata::{page, task};

#[derive(Default)]
pub(crate) struct FakeTaskService {
    tasks: Mutex<Vec<Task>>,
    fail_updates: AtomicBool,
    fail_lists: AtomicBool,
    hang_lists: AtomicBool,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl FakeTaskService {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// `list` never resolves while set.
    pub fn hang_lists(&self, hang: bool) {
        self.hang_lists.store(hang, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn server_state(&self, id: &str) -> Option<TaskState> {
        self.tasks
            .lock()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.state)
    }

    fn server_error() -> FetchError {
        FetchError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        }
    }
}

#[async_trait]
impl TaskQueryService for FakeTaskService {
    async fn list(&self, key: &QueryKey) -> Result<Paginated<Task>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_lists.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let matching: Vec<Task> = self
            .tasks
            .lock()
            .iter()
            .filter(|t| t.enable)
            .filter(|t| key.filters.state.map_or(true, |s| t.state == s))
            .filter(|t| key.filters.priority.map_or(true, |p| t.priority == p))
            .filter(|t| {
                key.filters
                    .title
                    .as_ref()
                    .map_or(true, |title| t.title.contains(title.as_str()))
            })
            .cloned()
            .collect();

        let size = key.size.max(1) as usize;
        let total = matching.len();
        let last_page = ((total + size - 1) / size).max(1) as u32;
        let skip = (key.page.max(1) as usize - 1) * size;
        let mut result = page(matching.into_iter().skip(skip).take(size).collect());
        result.current_page = key.page;
        result.last_page = last_page;
        result.per_page = key.size;
        result.total = total as u64;
        Ok(result)
    }

    async fn create(&self, data: &NewTask) -> Result<Task, FetchError> {
        let mut tasks = self.tasks.lock();
        let mut created = task(&format!("t{}", tasks.len() + 1), TaskState::Pending);
        created.title = data.title.clone();
        created.priority = data.priority.unwrap_or(false);
        tasks.push(created.clone());
        Ok(created)
    }

    async fn partial_update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, FetchError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let mut tasks = self.tasks.lock();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| FetchError::Status {
                status: 404,
                message: "Not Found".into(),
            })?;
        if let Some(state) = patch.state {
            task.state = state;
        }
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        Ok(task.clone())
    }

    async fn disable(&self, id: &TaskId) -> Result<(), FetchError> {
        let mut tasks = self.tasks.lock();
        if let Some(task) = tasks.iter_mut().find(|t| &t.id == id) {
            task.enable = false;
        }
        Ok(())
    }
}
