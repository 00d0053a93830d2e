use crate::model::TaskFilters;

/// Selects one cache slot: applied filters, page cursor and user scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub filters: TaskFilters,
    pub page: u32,
    pub size: u32,
    pub user_id: Option<String>,
}

impl QueryKey {
    pub fn new(filters: TaskFilters, page: u32, size: u32, user_id: Option<String>) -> Self {
        Self {
            filters,
            page,
            size,
            user_id,
        }
    }

    /// Query string of `GET /tarea` for this key; empty values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filters.query_pairs();
        if let Some(user_id) = self.user_id.as_ref().filter(|id| !id.is_empty()) {
            pairs.push(("usuario_id", user_id.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}
