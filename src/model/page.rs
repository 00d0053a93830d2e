use serde_derive::{Deserialize, Serialize};

use super::task::{Task, TaskId, TaskState};

/// Pagination envelope shared by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Paginated<Task> {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.data.iter().find(|task| task.id == id)
    }

    /// Copy of the page with one task moved to `state`; every other task is untouched.
    pub fn with_task_state(&self, id: &TaskId, state: TaskState) -> Paginated<Task> {
        Paginated {
            data: self
                .data
                .iter()
                .map(|task| {
                    if &task.id == id {
                        task.with_state(state)
                    } else {
                        task.clone()
                    }
                })
                .collect(),
            ..self.clone_envelope()
        }
    }

    fn clone_envelope(&self) -> Paginated<Task> {
        Paginated {
            data: Vec::new(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            from: self.from,
            to: self.to,
            next_page_url: self.next_page_url.clone(),
            prev_page_url: self.prev_page_url.clone(),
        }
    }
}
