use crate::entities::{Book, BookCreate, BookUpdate, BookWithAuthor, BulkBookCreate};
use crate::errors::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::pagination::{LimitOffset, OffsetPagination, PageParams};
use crate::traits::{Repository, UpdateMode};
use crate::unit_of_work::UnitOfWork;
use crate::validation::Validatable;
use axum::{Json, extract::State, http::StatusCode};
use sea_orm::DatabaseConnection;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<DatabaseConnection> {
    OpenApiRouter::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(bulk_create_books))
        .routes(routes!(get_book, put_book, patch_book, delete_book))
        .routes(routes!(get_book_detail))
}

/// List books, paginated
#[utoipa::path(
    get,
    path = "/book",
    tag = "book",
    params(PageParams),
    responses(
        (status = 200, description = "One page of books", body = OffsetPagination<Book>),
        (status = 400, description = "Invalid pagination"),
    ),
)]
pub async fn list_books(
    State(db): State<DatabaseConnection>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<OffsetPagination<Book>>, ApiError> {
    let page = LimitOffset::try_from(params)?;

    let uow = UnitOfWork::begin(&db).await?;
    let (items, total) = Book::list_and_count(&uow, page).await?;
    uow.commit().await?;

    Ok(Json(OffsetPagination::new(items, total, page)))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book",
    tag = "book",
    request_body = BookCreate,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "The author does not exist"),
    ),
)]
pub async fn create_book(
    State(db): State<DatabaseConnection>,
    AppJson(payload): AppJson<BookCreate>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    payload.validate()?;

    let uow = UnitOfWork::begin(&db).await?;
    let book = Book::add(&uow, payload).await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Create many books by the same author
///
/// Either every title is stored or none is.
#[utoipa::path(
    post,
    path = "/book/bulk",
    tag = "book",
    request_body = BulkBookCreate,
    responses(
        (status = 200, description = "Books created, in input order", body = [Book]),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "The author does not exist"),
    ),
)]
pub async fn bulk_create_books(
    State(db): State<DatabaseConnection>,
    AppJson(payload): AppJson<BulkBookCreate>,
) -> Result<Json<Vec<Book>>, ApiError> {
    payload.validate()?;

    let uow = UnitOfWork::begin(&db).await?;
    let books = Book::add_many(&uow, payload.into_creates()).await?;
    uow.commit().await?;

    tracing::debug!(count = books.len(), "bulk book insert committed");
    Ok(Json(books))
}

/// Get an existing book
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "book",
    params(("id" = Uuid, Path, description = "The book to retrieve")),
    responses(
        (status = 200, description = "The requested book", body = Book),
        (status = 404, description = "Book not found"),
    ),
)]
pub async fn get_book(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Book>, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    let book = Book::get(&uow, id).await?;
    uow.commit().await?;
    Ok(Json(book))
}

/// Get a book with its author inlined
#[utoipa::path(
    get,
    path = "/book/{id}/detail",
    tag = "book",
    params(("id" = Uuid, Path, description = "The book to retrieve")),
    responses(
        (status = 200, description = "The book and its author", body = BookWithAuthor),
        (status = 404, description = "Book not found"),
    ),
)]
pub async fn get_book_detail(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<BookWithAuthor>, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    let detail = Book::get_with_author(&uow, id).await?;
    uow.commit().await?;
    Ok(Json(detail))
}

/// Update a book, including empty values
#[utoipa::path(
    put,
    path = "/book/{id}",
    tag = "book",
    params(("id" = Uuid, Path, description = "The book to update")),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "The author does not exist"),
    ),
)]
pub async fn put_book(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<BookUpdate>,
) -> Result<Json<Book>, ApiError> {
    update_book(&db, id, payload, UpdateMode::Replace).await
}

/// Update a book, ignoring omitted values
#[utoipa::path(
    patch,
    path = "/book/{id}",
    tag = "book",
    params(("id" = Uuid, Path, description = "The book to update")),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "The author does not exist"),
    ),
)]
pub async fn patch_book(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<BookUpdate>,
) -> Result<Json<Book>, ApiError> {
    update_book(&db, id, payload, UpdateMode::Merge).await
}

async fn update_book(
    db: &DatabaseConnection,
    id: Uuid,
    payload: BookUpdate,
    mode: UpdateMode,
) -> Result<Json<Book>, ApiError> {
    payload.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    let book = Book::update(&uow, id, payload, mode).await?;
    uow.commit().await?;

    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "book",
    params(("id" = Uuid, Path, description = "The book to delete")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
    ),
)]
pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    Book::delete(&uow, id).await?;
    uow.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
