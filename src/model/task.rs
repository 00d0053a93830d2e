use chrono::{DateTime, NaiveDate, Utc};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

pub type TaskId = String;

/// Board column a task lives in.
///
/// The serialized names are the literal values the task API speaks and
/// must not be localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TaskState {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completada")]
    Completed,
}

impl TaskState {
    pub const ALL: [TaskState; 3] = [
        TaskState::Pending,
        TaskState::InProgress,
        TaskState::Completed,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            TaskState::Pending => "pendiente",
            TaskState::InProgress => "en_progreso",
            TaskState::Completed => "completada",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            TaskState::Pending => 0,
            TaskState::InProgress => 1,
            TaskState::Completed => 2,
        }
    }
}

impl Default for TaskState {
    fn default() -> Self {
        TaskState::Pending
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for TaskState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(TaskState::Pending),
            "en_progreso" => Ok(TaskState::InProgress),
            "completada" => Ok(TaskState::Completed),
            other => Err(ModelError::UnknownState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryRef {
    pub id: String,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRef {
    pub id: String,
    pub nombre: String,
}

/// A work item as returned by the task endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Passed through verbatim, the server decides the date format.
    #[serde(rename = "fecha_vencimiento", default)]
    pub due_date: Option<String>,
    #[serde(rename = "prioridad", default)]
    pub priority: bool,
    #[serde(rename = "estado")]
    pub state: TaskState,
    #[serde(default = "enabled")]
    pub enable: bool,
    #[serde(rename = "categoria", default)]
    pub category: Option<CategoryRef>,
    #[serde(rename = "usuario", default)]
    pub user: Option<UserRef>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn enabled() -> bool {
    true
}

impl Task {
    pub fn with_state(&self, state: TaskState) -> Task {
        Task {
            state,
            ..self.clone()
        }
    }
}

/// Body of `POST /tarea`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewTask {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fecha_vencimiento", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "prioridad", skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    pub categoria_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, categoria_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: None,
            categoria_id: categoria_id.into(),
            usuario_id: None,
        }
    }
}

/// Sparse body of `PUT /tarea/{id}`; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskPatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fecha_vencimiento", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "prioridad", skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<String>,
}

impl TaskPatch {
    pub fn state(state: TaskState) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }
}

/// Create and update responses come either as the bare task or wrapped
/// together with a server message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TaskReply {
    Wrapped {
        #[serde(rename = "tarea")]
        task: Task,
    },
    Bare(Task),
}

impl From<TaskReply> for Task {
    fn from(reply: TaskReply) -> Self {
        match reply {
            TaskReply::Wrapped { task } => task,
            TaskReply::Bare(task) => task,
        }
    }
}
