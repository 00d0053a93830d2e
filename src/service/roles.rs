use tracing::instrument;

use crate::client::{FetchClient, FetchError};
use crate::model::Role;

pub struct RoleService {
    client: FetchClient,
}

impl RoleService {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Roles are not paginated.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Role>, FetchError> {
        self.client.get("/roles", &[]).await
    }
}
