//! HTTP-level tests: the full router over in-memory stores

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use locallibrary_server::{
    api,
    config::AppConfig,
    models::{Author, Book},
    render::JsonRenderer,
    repository::{MemoryStore, Repository},
    services::Services,
    AppState,
};

fn app() -> Router {
    let mut repository = Repository::in_memory();
    repository.authors = Arc::new(MemoryStore::with_records(vec![Author {
        id: 1,
        first_name: "Jane".to_string(),
        family_name: "Austen".to_string(),
        date_of_birth: None,
        date_of_death: None,
    }]));
    repository.books = Arc::new(MemoryStore::with_records(vec![Book {
        id: 1,
        title: "Emma".to_string(),
        summary: "A matchmaker in Highbury.".to_string(),
        author: 1,
    }]));

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(repository)),
        renderer: Arc::new(JsonRenderer),
    };
    api::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_author_list_renders_view() {
    let response = app().oneshot(get("/catalog/authors")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["template"], "author_list");
    assert_eq!(body["data"]["title"], "Author List");
    assert_eq!(body["data"]["author_list"][0]["name"], "Austen, Jane");
}

#[tokio::test]
async fn test_create_author_redirects_to_new_record() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_form(
            "/catalog/author/create",
            "first_name=Bram&family_name=Stoker&date_of_birth=1847-11-08&date_of_death=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/author/2");

    let response = app.oneshot(get("/catalog/author/2")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["author"]["name"], "Stoker, Bram");
    assert_eq!(body["data"]["author"]["date_of_birth_formatted"], "November 8th, 1847");
}

#[tokio::test]
async fn test_invalid_author_form_is_re_rendered() {
    let response = app()
        .oneshot(post_form("/catalog/author/create", "first_name=Jo-hn&family_name="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["template"], "author_form");
    let messages: Vec<&str> = body["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"First name has non-alphanumeric characters."));
    assert!(messages.contains(&"Family name must be specified."));
}

#[tokio::test]
async fn test_missing_author_is_404() {
    let response = app().oneshot(get("/catalog/author/404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Author not found");
}

#[tokio::test]
async fn test_delete_author_with_books_is_refused() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_form("/catalog/author/1/delete", "authorid=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["template"], "author_delete");
    assert_eq!(body["data"]["author_books"][0]["title"], "Emma");

    let response = app.oneshot(get("/catalog/author/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_without_id_field_is_bad_request() {
    let response = app()
        .oneshot(post_form("/catalog/author/1/delete", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_instance_lifecycle() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_form(
            "/catalog/bookinstance/create",
            "book=1&imprint=John+Murray%2C+1815&status=Available&due_back=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstance/1");

    let response = app.clone().oneshot(get("/catalog/bookinstance/1")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["bookinstance"]["imprint"], "John Murray, 1815");
    assert_eq!(body["data"]["bookinstance"]["book_detail"]["title"], "Emma");

    let response = app
        .clone()
        .oneshot(post_form("/catalog/bookinstance/1/delete", "id=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");

    let response = app.oneshot(get("/catalog/bookinstance/1/delete")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");
}
