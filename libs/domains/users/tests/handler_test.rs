//! Handler tests for the Users domain
//!
//! These drive the domain router with an in-memory repository:
//! - Form deserialization and rejection
//! - Response serialization
//! - HTTP status codes and error bodies

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::{InMemoryUserRepository, User, UserService, handlers};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use test_utils::TestDataBuilder;
use test_utils::assertions::assert_object_id;
use tower::ServiceExt; // For oneshot()

const FORM: &str = "application/x-www-form-urlencoded";

fn app() -> Router {
    handlers::router(UserService::new(InMemoryUserRepository::new()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_form(method: &str, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", FORM)
        .body(Body::from(body.into()))
        .unwrap()
}

async fn create(app: &Router, body: impl Into<String>) -> User {
    let response = app
        .clone()
        .oneshot(with_form("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn error_message(response: axum::response::Response) -> String {
    let json: serde_json::Value = json_body(response.into_body()).await;
    json["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_list_users_empty() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let users: Vec<User> = json_body(response.into_body()).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_create_user_returns_201_and_can_be_fetched() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_create_201");

    let created = create(&app, builder.user_form("main")).await;
    assert_object_id(&created.id, "created user");
    assert_eq!(created.name, builder.name("user", "main"));
    assert_eq!(created.email, builder.email("main"));

    let response = app
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: User = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_user_trims_values() {
    let created = create(
        &app(),
        "name=%20%20Ada%20&email=%20ada%40example.com&password=secret%20",
    )
    .await;

    assert_eq!(created.name, "Ada");
    assert_eq!(created.email, "ada@example.com");
    assert_eq!(created.password, "secret");
}

#[tokio::test]
async fn test_create_user_whitespace_name_is_stored_empty() {
    let created = create(&app(), "name=%20%20%20&email=ada%40example.com&password=pw").await;
    assert_eq!(created.name, "");
}

#[tokio::test]
async fn test_create_user_missing_field_is_400() {
    let response = app()
        .oneshot(with_form("POST", "/", "name=Ada&email=ada%40example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(json["error"], "INVALID_FORM");
}

#[tokio::test]
async fn test_create_user_empty_field_is_400() {
    let response = app()
        .oneshot(with_form("POST", "/", "name=&email=ada%40example.com&password=pw"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Fields should not be empty");
}

#[tokio::test]
async fn test_create_user_invalid_email_is_400() {
    let response = app()
        .oneshot(with_form("POST", "/", "name=Ada&email=no-at-symbol&password=pw"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid email format");
}

#[tokio::test]
async fn test_get_user_malformed_id_is_404() {
    let response = app().oneshot(get("/not-an-id")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "User not-an-id doesn't exist");
}

#[tokio::test]
async fn test_get_user_unknown_id_is_404() {
    let id = ObjectId::new().to_hex();
    let response = app().oneshot(get(&format!("/{}", id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        error_message(response).await,
        format!("User {} doesn't exist", id)
    );
}

#[tokio::test]
async fn test_update_user_then_fetch() {
    let app = app();
    let created = create(&app, "name=Ada&email=ada%40example.com&password=pw").await;
    let uri = format!("/{}", created.id);

    let response = app
        .clone()
        .oneshot(with_form(
            "PUT",
            &uri,
            "name=Grace&email=grace%40example.com&password=cobol",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: User = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Grace");

    let response = app.oneshot(get(&uri)).await.unwrap();
    let fetched: User = json_body(response.into_body()).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_user_unknown_id_is_404() {
    let uri = format!("/{}", ObjectId::new().to_hex());
    let response = app()
        .oneshot(with_form("PUT", &uri, "name=Ada&email=ada%40example.com&password=pw"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_missing_field_on_malformed_id_is_404() {
    let response = app()
        .oneshot(with_form("PUT", "/not-an-id", "name=Ada"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "User not-an-id doesn't exist");
}

#[tokio::test]
async fn test_update_user_missing_field_on_unknown_id_is_404() {
    let uri = format!("/{}", ObjectId::new().to_hex());
    let response = app()
        .oneshot(with_form("PUT", &uri, "name=Ada"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_missing_field_on_existing_id_is_400() {
    let app = app();
    let created = create(&app, "name=Ada&email=ada%40example.com&password=pw").await;

    let response = app
        .oneshot(with_form("PUT", &format!("/{}", created.id), "name=Ada"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(json["error"], "INVALID_FORM");
}

#[tokio::test]
async fn test_update_user_invalid_email_is_400() {
    let app = app();
    let created = create(&app, "name=Ada&email=ada%40example.com&password=pw").await;

    let response = app
        .oneshot(with_form(
            "PUT",
            &format!("/{}", created.id),
            "name=Ada&email=ada%40localhost&password=pw",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid email format");
}

#[tokio::test]
async fn test_delete_user_returns_204_then_404() {
    let app = app();
    let created = create(&app, "name=Ada&email=ada%40example.com&password=pw").await;
    let uri = format!("/{}", created.id);

    let response = app.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let response = app.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_after_inserts() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_list");

    for suffix in ["a", "b", "c"] {
        create(&app, builder.user_form(suffix)).await;
    }

    let response = app.oneshot(get("/")).await.unwrap();
    let users: Vec<User> = json_body(response.into_body()).await;
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].email, builder.email("a"));
}
