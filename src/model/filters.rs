use chrono::NaiveDate;

use super::task::TaskState;

/// Filters accepted by `GET /tarea`, after the user confirmed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaskFilters {
    pub title: Option<String>,
    pub state: Option<TaskState>,
    pub priority: Option<bool>,
    pub categoria_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl TaskFilters {
    pub fn is_empty(&self) -> bool {
        *self == TaskFilters::default()
    }

    /// Query string pairs for the filters that carry a value.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = self.title.as_ref().filter(|t| !t.trim().is_empty()) {
            pairs.push(("titulo", title.clone()));
        }
        if let Some(state) = self.state {
            pairs.push(("estado", state.as_wire().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("prioridad", priority.to_string()));
        }
        if let Some(categoria_id) = self.categoria_id.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("categoria_id", categoria_id.clone()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("fecha_desde", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("fecha_hasta", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
