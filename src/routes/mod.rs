//! HTTP surface: one controller module per entity, merged into a single
//! router that also serves its own OpenAPI document at `/openapi.json`.

pub mod author;
pub mod book;

use axum::{Json, Router, routing::get};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bookshelf",
        description = "CRUD API for authors and their books"
    ),
    tags(
        (name = "author", description = "Author CRUD"),
        (name = "book", description = "Book CRUD")
    )
)]
pub struct ApiDoc;

/// Build the application router over `db`
pub fn router(db: DatabaseConnection) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(author::router())
        .merge(book::router())
        .with_state(db)
        .split_for_parts();

    router.route(
        "/openapi.json",
        get(move || {
            let api = api.clone();
            async move { Json(api) }
        }),
    )
}
