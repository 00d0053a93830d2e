//! The whole stack against a mocked task API.

use httpmock::Method::{GET, PUT};
use httpmock::MockServer;
use serde_json::json;
use std::sync::Arc;

use crate::board::{BoardSynchronizer, TransitionOutcome};
use crate::cache::{Provenance, TaskCache};
use crate::client::{FetchClient, FetchError};
use crate::controller::FilterController;
use crate::model::{Session, SessionUser, TaskState};
use crate::service::HttpTaskService;

fn board(server: &MockServer) -> BoardSynchronizer<HttpTaskService> {
    let session = Session::new(
        "token",
        SessionUser {
            id: "u1".into(),
            usuario: Some("ana".into()),
            nombre: None,
        },
    );
    let client =
        FetchClient::with_client(reqwest::Client::new(), &server.url("/api"), session.clone())
            .unwrap();
    let controller = FilterController::new(
        Arc::new(HttpTaskService::new(client)),
        Arc::new(TaskCache::new()),
        &session,
        10,
    );
    BoardSynchronizer::new(Arc::new(controller))
}

fn listing(estado: &str) -> serde_json::Value {
    json!({
        "data": [
            { "id": "t1", "titulo": "Informe", "estado": estado, "prioridad": true },
            { "id": "t2", "titulo": "Revisión", "estado": "completada", "prioridad": false }
        ],
        "current_page": 1,
        "last_page": 1,
        "per_page": 10,
        "total": 2,
        "from": 1,
        "to": 2,
        "next_page_url": null,
        "prev_page_url": null
    })
}

fn cached_state(sync: &BoardSynchronizer<HttpTaskService>, id: &str) -> TaskState {
    sync.controller().current().unwrap().task(id).unwrap().state
}

#[tokio::test]
async fn test_failed_drop_snaps_back() {
    // GIVEN t1 pending on the server, which refuses the update
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/tarea")
                .query_param("usuario_id", "u1")
                .header("authorization", "Bearer token");
            then.status(200).json_body(listing("pendiente"));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/tarea/t1")
                .json_body(json!({ "estado": "en_progreso" }));
            then.status(500)
                .json_body(json!({ "error": "Error al actualizar la tarea" }));
        })
        .await;
    let sync = board(&server);
    sync.controller().refresh().await.unwrap();
    let before = sync.controller().current().unwrap();

    // WHEN t1 is dropped onto the in progress column
    let transition = sync
        .begin(&"t1".to_string(), TaskState::InProgress)
        .unwrap()
        .unwrap();

    // THEN the card moved before any request went out
    assert_eq!(cached_state(&sync, "t1"), TaskState::InProgress);
    assert_eq!(update.hits_async().await, 0);

    // WHEN the server answers
    let outcome = sync.complete(transition).await;

    // THEN
    update.assert_async().await;
    match outcome {
        TransitionOutcome::RolledBack(FetchError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Error al actualizar la tarea");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(cached_state(&sync, "t1"), TaskState::Pending);
    assert_eq!(*sync.controller().current().unwrap(), *before);
    assert_eq!(list.hits_async().await, 2);
}

#[tokio::test]
async fn test_confirmed_drop_is_replaced_by_server_data() {
    // GIVEN
    let server = MockServer::start_async().await;
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tarea");
            then.status(200).json_body(listing("pendiente"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/tarea/t1");
            then.status(200).json_body(json!({
                "message": "Tarea actualizada",
                "tarea": { "id": "t1", "titulo": "Informe", "estado": "completada" }
            }));
        })
        .await;
    let sync = board(&server);
    sync.controller().refresh().await.unwrap();
    list.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tarea");
            then.status(200).json_body(listing("completada"));
        })
        .await;

    // WHEN
    let outcome = sync
        .drop_task(&"t1".to_string(), TaskState::Completed)
        .await
        .unwrap();

    // THEN
    assert!(matches!(outcome, TransitionOutcome::Confirmed));
    let key = sync.controller().current_key();
    let entry = sync.controller().cache().entry(&key).unwrap();
    assert_eq!(entry.provenance(), Provenance::Authoritative);
    let board = sync.board().unwrap();
    assert!(board.column(TaskState::Pending).is_empty());
    assert_eq!(board.column(TaskState::Completed).len(), 2);
}

#[tokio::test]
async fn test_applied_filters_reach_the_server() {
    // GIVEN
    let server = MockServer::start_async().await;
    let filtered = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/tarea")
                .query_param("titulo", "Informe")
                .query_param("prioridad", "true")
                .query_param("page", "1")
                .query_param("size", "10");
            then.status(200).json_body(listing("en_progreso"));
        })
        .await;
    let sync = board(&server);

    // WHEN
    sync.controller().edit_draft(|d| {
        d.titulo = " Informe ".into();
        d.prioridad = Some(true);
    });
    assert_eq!(filtered.hits_async().await, 0);
    sync.controller().apply().await.unwrap();

    // THEN
    filtered.assert_async().await;
    assert_eq!(cached_state(&sync, "t1"), TaskState::InProgress);
}

#[tokio::test]
async fn test_failed_list_shows_error_and_keeps_board() {
    // GIVEN
    let server = MockServer::start_async().await;
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tarea");
            then.status(200).json_body(listing("pendiente"));
        })
        .await;
    let sync = board(&server);
    sync.controller().refresh().await.unwrap();
    list.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tarea");
            then.status(503).json_body(json!({ "message": "Mantenimiento" }));
        })
        .await;

    // WHEN
    let result = sync.controller().refresh().await;

    // THEN
    assert!(result.is_err());
    assert_eq!(
        sync.controller().error().as_deref(),
        Some("http status 503: Mantenimiento")
    );
    assert_eq!(sync.board().unwrap().len(), 2);
}
