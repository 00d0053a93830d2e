use serde_json::json;
use tracing::instrument;

use crate::client::{FetchClient, FetchError};
use crate::model::catalog::CategoryReply;
use crate::model::{Category, OperationReply, Paginated};

const CATEGORIES_PATH: &str = "/categoria";

pub struct CategoryService {
    client: FetchClient,
}

impl CategoryService {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u32,
        size: u32,
        nombre: Option<&str>,
    ) -> Result<Paginated<Category>, FetchError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(nombre) = nombre.filter(|n| !n.trim().is_empty()) {
            query.push(("nombre", nombre.to_string()));
        }
        self.client.get(CATEGORIES_PATH, &query).await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, nombre: &str) -> Result<Category, FetchError> {
        let reply: CategoryReply = self
            .client
            .post(CATEGORIES_PATH, &json!({ "nombre": nombre }))
            .await?;
        Ok(reply.categoria)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, nombre: &str) -> Result<OperationReply, FetchError> {
        self.client
            .put(
                &format!("{}/{}", CATEGORIES_PATH, id),
                &json!({ "nombre": nombre }),
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn disable(&self, id: &str) -> Result<OperationReply, FetchError> {
        self.client
            .patch(&format!("{}/{}/disable", CATEGORIES_PATH, id))
            .await
    }
}
