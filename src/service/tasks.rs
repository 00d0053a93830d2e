use async_trait::async_trait;
use tracing::{debug, instrument};

use super::TaskQueryService;
use crate::cache::QueryKey;
use crate::client::{FetchClient, FetchError};
use crate::model::task::TaskReply;
use crate::model::{NewTask, OperationReply, Paginated, Task, TaskId, TaskPatch};

const TASKS_PATH: &str = "/tarea";

pub struct HttpTaskService {
    client: FetchClient,
}

impl HttpTaskService {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl TaskQueryService for HttpTaskService {
    #[instrument(skip(self))]
    async fn list(&self, key: &QueryKey) -> Result<Paginated<Task>, FetchError> {
        let page: Paginated<Task> = self.client.get(TASKS_PATH, &key.query_pairs()).await?;
        debug!(
            total = page.total,
            current_page = page.current_page,
            last_page = page.last_page,
            "tasks listed"
        );
        Ok(page)
    }

    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn create(&self, data: &NewTask) -> Result<Task, FetchError> {
        let reply: TaskReply = self.client.post(TASKS_PATH, data).await?;
        Ok(reply.into())
    }

    #[instrument(skip(self))]
    async fn partial_update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, FetchError> {
        let reply: TaskReply = self
            .client
            .put(&format!("{}/{}", TASKS_PATH, id), patch)
            .await?;
        Ok(reply.into())
    }

    #[instrument(skip(self))]
    async fn disable(&self, id: &TaskId) -> Result<(), FetchError> {
        let _: Option<OperationReply> = self
            .client
            .patch(&format!("{}/{}/disable", TASKS_PATH, id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::{GET, PATCH, POST, PUT};
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::model::{Session, SessionUser, TaskFilters, TaskState};

    fn service(server: &MockServer) -> HttpTaskService {
        let session = Session::new(
            "token",
            SessionUser {
                id: "u1".into(),
                usuario: None,
                nombre: None,
            },
        );
        HttpTaskService::new(
            FetchClient::with_client(reqwest::Client::new(), &server.url("/api"), session)
                .unwrap(),
        )
    }

    fn task_json(id: &str, estado: &str) -> serde_json::Value {
        json!({
            "id": id,
            "titulo": format!("task {}", id),
            "estado": estado,
            "prioridad": false,
            "categoria": { "id": "c1", "nombre": "General" }
        })
    }

    #[tokio::test]
    async fn test_list_sends_only_filled_filters() {
        // GIVEN
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/tarea")
                    .query_param("estado", "en_progreso")
                    .query_param("usuario_id", "u1")
                    .query_param("page", "2")
                    .query_param("size", "5");
                then.status(200).json_body(json!({
                    "data": [task_json("t1", "en_progreso")],
                    "current_page": 2,
                    "last_page": 3,
                    "per_page": 5,
                    "total": 11,
                    "from": 6,
                    "to": 6,
                    "next_page_url": "http://localhost/api/tarea?page=3",
                    "prev_page_url": "http://localhost/api/tarea?page=1"
                }));
            })
            .await;
        let key = QueryKey::new(
            TaskFilters {
                state: Some(TaskState::InProgress),
                title: Some(String::new()),
                ..Default::default()
            },
            2,
            5,
            Some("u1".into()),
        );

        // WHEN
        let page = service(&server).list(&key).await.unwrap();

        // THEN
        mock.assert_async().await;
        assert_eq!(page.last_page, 3);
        assert_eq!(page.data[0].state, TaskState::InProgress);
    }

    #[tokio::test]
    async fn test_partial_update_sends_sparse_body() {
        // GIVEN
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/tarea/t1")
                    .json_body(json!({ "estado": "completada" }));
                then.status(200).json_body(json!({
                    "message": "Tarea actualizada",
                    "tarea": task_json("t1", "completada")
                }));
            })
            .await;

        // WHEN
        let task = service(&server)
            .partial_update(&"t1".to_string(), &TaskPatch::state(TaskState::Completed))
            .await
            .unwrap();

        // THEN
        mock.assert_async().await;
        assert_eq!(task.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn test_create_and_disable() {
        // GIVEN
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/tarea").json_body(json!({
                    "titulo": "nueva",
                    "categoria_id": "c1",
                    "usuario_id": "u1"
                }));
                then.status(201).json_body(task_json("t9", "pendiente"));
            })
            .await;
        let disable = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/api/tarea/t9/disable");
                then.status(200)
                    .json_body(json!({ "message": "Tarea deshabilitada" }));
            })
            .await;
        let service = service(&server);
        let mut data = NewTask::new("nueva", "c1");
        data.usuario_id = Some("u1".into());

        // WHEN
        let task = service.create(&data).await.unwrap();
        service.disable(&task.id).await.unwrap();

        // THEN
        create.assert_async().await;
        disable.assert_async().await;
        assert_eq!(task.state, TaskState::Pending);
    }

    #[tokio::test]
    async fn test_update_validation_error() {
        // GIVEN
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/tarea/t1");
                then.status(422)
                    .json_body(json!({ "message": "El estado no es válido" }));
            })
            .await;

        // WHEN
        let err = service(&server)
            .partial_update(&"t1".to_string(), &TaskPatch::state(TaskState::Pending))
            .await
            .unwrap_err();

        // THEN
        assert!(matches!(err, FetchError::Status { status: 422, .. }));
    }
}
