use tracing::instrument;

use crate::client::{FetchClient, FetchError};
use crate::model::{OperationReply, Paginated, User, UserFilters, UserUpdate};

const USERS_PATH: &str = "/usuarios";

pub struct UserService {
    client: FetchClient,
}

impl UserService {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u32,
        size: u32,
        filters: &UserFilters,
    ) -> Result<Paginated<User>, FetchError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        query.extend(filters.query_pairs());
        self.client.get(USERS_PATH, &query).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, id: &str, data: &UserUpdate) -> Result<OperationReply, FetchError> {
        self.client
            .put(&format!("{}/{}", USERS_PATH, id), data)
            .await
    }

    #[instrument(skip(self))]
    pub async fn disable(&self, id: &str) -> Result<OperationReply, FetchError> {
        self.client
            .patch(&format!("{}/{}/disable", USERS_PATH, id))
            .await
    }
}
