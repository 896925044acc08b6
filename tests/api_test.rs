use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use media_catalog::adapters::memory::MediaRepository as InMemoryMediaRepository;
use media_catalog::api::handlers::AppState;
use media_catalog::api::router::create_router;
use media_catalog::api::types::*;
use media_catalog::application::catalog::ServiceDependencies;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// インメモリストレージと実際のAPIルーターでアプリケーションを組み立てる
fn setup_app() -> axum::Router {
    let service_deps = ServiceDependencies {
        media_repository: Arc::new(InMemoryMediaRepository::new()),
    };
    let app_state = Arc::new(AppState { service_deps });

    create_router(app_state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create(app: &axum::Router, body: Value) -> MediaResponse {
    let response = send(app, post_json("/media", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

fn book_body() -> Value {
    json!({
        "media_type": "book",
        "title": "T",
        "creator": "C",
        "publication_date": "1999-12-31",
        "isbn": "123",
        "page_count": 10,
    })
}

fn movie_body() -> Value {
    json!({
        "media_type": "movie",
        "title": "Test title",
        "creator": "Test creator",
        "publication_date": "1999-12-31",
        "duration": 199,
        "format": "mp4",
    })
}

fn audiobook_body() -> Value {
    json!({
        "media_type": "audiobook",
        "title": "Dune",
        "creator": "Frank Herbert",
        "publication_date": "1965-08-01",
        "duration": "1260",
        "narrator": "Scott Brick",
    })
}

// ============================================================================
// 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_book_flow() {
    let app = setup_app();

    // Step 1: 登録（POST /media）
    let book = create(&app, book_body()).await;
    assert_eq!(book.media_type, "book");
    assert_eq!(book.title, "T");
    assert_eq!(book.isbn.as_deref(), Some("123"));
    assert_eq!(book.page_count, Some(10));
    assert!(!book.is_borrowed);
    assert!(book.duration.is_none());

    // Step 2: 詳細取得（GET /media/book/:id）
    let response = send(&app, get(&format!("/media/book/{}", book.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail: MediaDetailResponse = read_json(response).await;
    let actions: Vec<&str> = detail
        .available_actions
        .iter()
        .map(|a| a.action.as_str())
        .collect();
    assert_eq!(actions, vec!["describe", "read", "borrow"]);
    assert_eq!(detail.available_actions[1].label, "Read sample");

    // Step 3: 貸出（POST /media/book/:id/action）
    let request = Request::builder()
        .method("POST")
        .uri(format!("/media/book/{}/action", book.id))
        .header("content-type", "application/json")
        .header("x-user", "alice")
        .body(Body::from(json!({ "action": "borrow" }).to_string()))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: ActionResultResponse = read_json(response).await;
    assert!(result.result.contains("alice"));

    // Step 4: 貸出後の詳細にはborrowがない
    let response = send(&app, get(&format!("/media/book/{}", book.id))).await;
    let detail: MediaDetailResponse = read_json(response).await;
    assert!(detail.media.is_borrowed);
    assert_eq!(detail.media.borrowed_by.as_deref(), Some("alice"));
    assert!(
        detail
            .available_actions
            .iter()
            .all(|a| a.action != "borrow")
    );

    // Step 5: 再度の貸出は409
    let response = send(
        &app,
        post_json(&format!("/media/book/{}/borrow", book.id), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_groups_by_type() {
    let app = setup_app();
    create(&app, book_body()).await;
    create(&app, movie_body()).await;
    create(&app, audiobook_body()).await;

    let response = send(&app, get("/media")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let list: MediaListResponse = read_json(response).await;
    assert_eq!(list.books.len(), 1);
    assert_eq!(list.movies.len(), 1);
    assert_eq!(list.audiobooks.len(), 1);
    assert_eq!(list.audiobooks[0].narrator.as_deref(), Some("Scott Brick"));
    assert_eq!(list.audiobooks[0].duration, Some(1260));
}

#[tokio::test]
async fn test_action_defaults_to_describe() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    let response = send(
        &app,
        post_json(&format!("/media/movie/{}/action", movie.id), json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: ActionResultResponse = read_json(response).await;
    assert!(result.result.contains("Test title"));
}

#[tokio::test]
async fn test_movie_trailer_and_download() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    let response = send(
        &app,
        post_json(
            &format!("/media/movie/{}/action", movie.id),
            json!({ "action": "play_trailer" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: ActionResultResponse = read_json(response).await;
    assert!(!result.result.is_empty());

    let response = send(
        &app,
        post_json(&format!("/media/movie/{}/download", movie.id), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// 異常系
// ============================================================================

#[tokio::test]
async fn test_create_validation_errors_are_field_keyed() {
    let app = setup_app();

    let response = send(
        &app,
        post_json(
            "/media",
            json!({
                "media_type": "audiobook",
                "title": "Dune",
                "creator": "Frank Herbert",
                "publication_date": "1965-08-01",
                "duration": 0,
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    let fields = error.fields.expect("validation errors should list fields");
    assert_eq!(
        fields.get("duration"),
        Some(&vec![
            "Ensure this value is greater than or equal to 1.".to_string()
        ])
    );
    assert_eq!(
        fields.get("narrator"),
        Some(&vec!["Narrator is required for audiobooks".to_string()])
    );

    // 何も保存されていない
    let list: MediaListResponse = read_json(send(&app, get("/media")).await).await;
    assert!(list.audiobooks.is_empty());
}

#[tokio::test]
async fn test_unknown_type_is_bad_request() {
    let app = setup_app();

    let response = send(&app, get(&format!("/media/podcast/{}", Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Unknown media type");

    let mut body = book_body();
    body["media_type"] = json!("podcast");
    let response = send(&app, post_json("/media", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let app = setup_app();

    let response = send(
        &app,
        post_json(
            &format!("/media/book/{}/action", Uuid::new_v4()),
            json!({ "action": "describe" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Media not found");
}

#[tokio::test]
async fn test_book_only_action_on_movie_is_unknown_action() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    let response = send(
        &app,
        post_json(
            &format!("/media/movie/{}/action", movie.id),
            json!({ "action": "read" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Unknown action");
}

#[tokio::test]
async fn test_book_download() {
    let app = setup_app();
    let book = create(&app, book_body()).await;

    // アクションテーブル経由では固定の文言
    let response = send(
        &app,
        post_json(
            &format!("/media/book/{}/action", book.id),
            json!({ "action": "download" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: ActionResultResponse = read_json(response).await;
    assert_eq!(result.result, "Books are not available for download");

    // 専用エンドポイントでは400
    let response = send(
        &app,
        post_json(&format!("/media/book/{}/download", book.id), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "This item cannot be downloaded");
}

#[tokio::test]
async fn test_movie_cannot_be_borrowed() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    let response = send(
        &app,
        post_json(&format!("/media/movie/{}/borrow", movie.id), json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "This item cannot be borrowed");
}

#[tokio::test]
async fn test_action_with_empty_body_defaults_to_describe() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    // Content-Typeも本文もないPOST
    let request = Request::builder()
        .method("POST")
        .uri(format!("/media/movie/{}/action", movie.id))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: ActionResultResponse = read_json(response).await;
    assert!(result.result.contains("Test title"));
}

#[tokio::test]
async fn test_malformed_action_body_is_bad_request() {
    let app = setup_app();
    let movie = create(&app, movie_body()).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/media/movie/{}/action", movie.id))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.fields.unwrap().contains_key(BODY_FIELD));
}

#[tokio::test]
async fn test_non_uuid_id_is_not_found() {
    let app = setup_app();

    let response = send(&app, get("/media/book/42")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Media not found");

    let response = send(&app, post_json("/media/book/42/action", json!({}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, post_json("/media/audiobook/42/borrow", json!({}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_type_is_reported_before_id() {
    let app = setup_app();

    let response = send(&app, get("/media/podcast/42")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Unknown media type");

    let response = send(&app, post_json("/media/podcast/42/download", json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Unknown media type");
}

#[tokio::test]
async fn test_create_without_media_type_is_field_error() {
    let app = setup_app();

    let mut body = book_body();
    body.as_object_mut().unwrap().remove("media_type");
    let response = send(&app, post_json("/media", body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Validation failed");
    assert_eq!(
        error.fields.unwrap().get("media_type"),
        Some(&vec!["This field is required.".to_string()])
    );

    let list: MediaListResponse = read_json(send(&app, get("/media")).await).await;
    assert!(list.books.is_empty());
}

#[tokio::test]
async fn test_create_with_malformed_json_is_bad_request() {
    let app = setup_app();

    let request = Request::builder()
        .method("POST")
        .uri("/media")
        .header("content-type", "application/json")
        .body(Body::from("{\"media_type\": \"book\""))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.fields.unwrap().contains_key(BODY_FIELD));
}
