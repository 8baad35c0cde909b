use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

mod common;
use common::{create_author, create_book, send, setup_test_app, setup_test_db};

fn titles(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_book_for_existing_author() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let (status, book) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"title": "First Novel", "author_id": author["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["title"], "First Novel");
    assert_eq!(book["author_id"], author["id"]);
    assert!(book["created_at"].is_string());
    assert_eq!(book["created_at"], book["updated_at"]);

    let (status, fetched) = send(&app, Method::GET, &format!("/book/{}", book["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, book);
}

#[tokio::test]
async fn test_create_book_for_missing_author_conflicts() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"title": "Orphan", "author_id": Uuid::nil()})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Foreign key constraint violated");

    let (_, page) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_create_book_rejects_blank_title() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"title": "", "author_id": author["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0], "title must not be blank");
}

#[tokio::test]
async fn test_bulk_create_keeps_input_order() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let (status, books) = send(
        &app,
        Method::POST,
        "/book/bulk",
        Some(json!({"title": ["Book Title 1", "Book Title 2", "Book Title 3"], "author_id": author["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&books), ["Book Title 1", "Book Title 2", "Book Title 3"]);
    assert!(books.as_array().unwrap().iter().all(|b| b["author_id"] == author["id"]));

    let (_, page) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(page["total"], 3);
    assert_eq!(titles(&page["items"]), ["Book Title 1", "Book Title 2", "Book Title 3"]);
}

#[tokio::test]
async fn test_bulk_create_with_no_titles_returns_empty_list() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let (status, books) = send(
        &app,
        Method::POST,
        "/book/bulk",
        Some(json!({"title": [], "author_id": author["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_bulk_create_for_missing_author_stores_nothing() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, _) = send(
        &app,
        Method::POST,
        "/book/bulk",
        Some(json!({"title": ["A", "B"], "author_id": Uuid::nil()})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, page) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_bulk_create_with_blank_title_stores_nothing() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/book/bulk",
        Some(json!({"title": ["Fine", " "], "author_id": author["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0], "title[1] must not be blank");

    let (_, page) = send(&app, Method::GET, "/book", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_list_second_page() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    for i in 0..5 {
        create_book(&app, &format!("Book {i}"), &author["id"]).await;
    }

    let (status, page) = send(&app, Method::GET, "/book?currentPage=2&pageSize=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&page["items"]), ["Book 2", "Book 3"]);
    assert_eq!(page["total"], 5);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 2);
}

#[tokio::test]
async fn test_list_past_the_end_is_empty() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    create_book(&app, "Lonely", &author["id"]).await;

    let (status, page) = send(&app, Method::GET, "/book?currentPage=3&pageSize=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["total"], 1);
    assert_eq!(page["offset"], 20);
}

#[tokio::test]
async fn test_list_rejects_invalid_pagination() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    for query in ["currentPage=0", "pageSize=-1", "pageSize=0", "pageSize=abc"] {
        let (status, body) = send(&app, Method::GET, &format!("/book?{query}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(body["error"], "Validation failed");
    }
}

#[tokio::test]
async fn test_book_detail_inlines_author() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let book = create_book(&app, "First Novel", &author["id"]).await;

    let uri = format!("/book/{}/detail", book["id"].as_str().unwrap());
    let (status, detail) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "First Novel");
    assert_eq!(detail["author"], author);
}

#[tokio::test]
async fn test_patch_title_keeps_author() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let book = create_book(&app, "Draft", &author["id"]).await;
    let uri = format!("/book/{}", book["id"].as_str().unwrap());

    let (status, patched) = send(&app, Method::PATCH, &uri, Some(json!({"title": "Final"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Final");
    assert_eq!(patched["author_id"], author["id"]);
    assert_eq!(patched["created_at"], book["created_at"]);
}

#[tokio::test]
async fn test_put_moves_book_to_other_author() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = create_author(&app, "First").await;
    let second = create_author(&app, "Second").await;
    let book = create_book(&app, "Shared", &first["id"]).await;
    let uri = format!("/book/{}", book["id"].as_str().unwrap());

    let (status, replaced) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Shared", "author_id": second["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["author_id"], second["id"]);
}

#[tokio::test]
async fn test_patch_to_missing_author_conflicts_and_keeps_row() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let book = create_book(&app, "Stays Put", &author["id"]).await;
    let uri = format!("/book/{}", book["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"author_id": Uuid::nil()}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, book);
}

#[tokio::test]
async fn test_delete_book() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let author = create_author(&app, "Jane Doe").await;
    let book = create_book(&app, "Ephemeral", &author["id"]).await;
    let uri = format!("/book/{}", book["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let author_uri = format!("/author/{}", author["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &author_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    for path in ["/author", "/author/{id}", "/book", "/book/bulk", "/book/{id}/detail"] {
        assert!(doc["paths"][path].is_object(), "missing {path}");
    }
}
