#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use bookshelf::migration::Migrator;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    bookshelf::routes::router(db)
}

/// Send one request and decode the JSON response; an empty body decodes to `Null`
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn create_author(app: &Router, name: &str) -> Value {
    let (status, author) = send(
        app,
        Method::POST,
        "/author",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    author
}

pub async fn create_book(app: &Router, title: &str, author_id: &Value) -> Value {
    let (status, book) = send(
        app,
        Method::POST,
        "/book",
        Some(serde_json::json!({ "title": title, "author_id": author_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    book
}
