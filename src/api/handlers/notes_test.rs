//! Integration tests for the note endpoints.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api::{AppState, create_router};
use crate::store::{Note, SqliteStore, StoreError, StoreResult, Storer};

/// Create a test app with an in-memory store
async fn test_app() -> axum::Router {
    let store = SqliteStore::in_memory().await.unwrap();
    create_router(AppState::new(store))
}

/// Store whose every call fails like a dropped database connection.
struct FailingStore;

impl Storer for FailingStore {
    async fn get(&self, _uuid: &str) -> StoreResult<Note> {
        Err(StoreError::operation("getting note from db")(
            std::io::Error::other("connection reset"),
        ))
    }

    async fn create(&self, _note: &Note) -> StoreResult<()> {
        Err(StoreError::operation("creating note in db")(
            std::io::Error::other("connection reset"),
        ))
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

async fn text_body(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn post_note(app: &axum::Router, body: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get_path(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn index_prompts_for_a_note() {
    let app = test_app().await;

    let response = get_path(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "POST a note");
}

#[tokio::test(flavor = "multi_thread")]
async fn post_empty_note_is_unprocessable() {
    let app = test_app().await;

    let response = post_note(&app, "").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(text_body(response).await, "invalid empty note");
}

#[tokio::test(flavor = "multi_thread")]
async fn post_then_get_returns_body() {
    let app = test_app().await;

    let response = post_note(&app, "foobar").await;
    assert_eq!(response.status(), StatusCode::OK);
    let uuid = text_body(response).await;

    let parsed = Uuid::parse_str(&uuid).expect("response should be a uuid");
    assert_eq!(parsed.get_version_num(), 4);

    let response = get_path(&app, &format!("/{}", uuid)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "foobar");
}

#[tokio::test(flavor = "multi_thread")]
async fn each_post_gets_a_fresh_uuid() {
    let app = test_app().await;

    let first = text_body(post_note(&app, "same body").await).await;
    let second = text_body(post_note(&app, "same body").await).await;
    assert_ne!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_note_is_not_found_with_empty_body() {
    let app = test_app().await;

    let response = get_path(&app, "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(text_body(response).await, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_with_empty_id_is_unprocessable() {
    let state = AppState::new(SqliteStore::in_memory().await.unwrap());

    let (status, body) = super::get_note(State(state), Path(String::new()))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, "note_id required");
}

#[tokio::test(flavor = "multi_thread")]
async fn store_failures_are_internal_errors() {
    let app = create_router(AppState::new(FailingStore));

    let response = post_note(&app, "foobar").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text_body(response).await, "internal server error");

    let response = get_path(&app, "/11111111-1111-4111-8111-111111111111").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = text_body(response).await;
    assert!(!body.contains("connection reset"));
}

#[tokio::test(flavor = "multi_thread")]
async fn post_with_invalid_utf8_stores_replacement_characters() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(vec![b'a', 0xff, 0xfe, b'b']))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let uuid = text_body(response).await;

    let response = get_path(&app, &format!("/{}", uuid)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "a\u{FFFD}\u{FFFD}b");
}

#[tokio::test(flavor = "multi_thread")]
async fn docs_are_served() {
    let app = test_app().await;

    let response = get_path(&app, "/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("Notes API"));
}
