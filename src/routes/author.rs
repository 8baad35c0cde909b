use crate::entities::{Author, AuthorCreate, AuthorUpdate, AuthorWithBooks};
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
        .routes(routes!(list_authors, create_author))
        .routes(routes!(get_author, put_author, patch_author, delete_author))
        .routes(routes!(get_author_detail))
}

/// List authors, paginated
#[utoipa::path(
    get,
    path = "/author",
    tag = "author",
    params(PageParams),
    responses(
        (status = 200, description = "One page of authors", body = OffsetPagination<Author>),
        (status = 400, description = "Invalid pagination"),
    ),
)]
pub async fn list_authors(
    State(db): State<DatabaseConnection>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<OffsetPagination<Author>>, ApiError> {
    let page = LimitOffset::try_from(params)?;

    let uow = UnitOfWork::begin(&db).await?;
    let (items, total) = Author::list_and_count(&uow, page).await?;
    uow.commit().await?;

    Ok(Json(OffsetPagination::new(items, total, page)))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/author",
    tag = "author",
    request_body = AuthorCreate,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation failed"),
    ),
)]
pub async fn create_author(
    State(db): State<DatabaseConnection>,
    AppJson(payload): AppJson<AuthorCreate>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    payload.validate()?;

    let uow = UnitOfWork::begin(&db).await?;
    let author = Author::add(&uow, payload).await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(author)))
}

/// Get an existing author
#[utoipa::path(
    get,
    path = "/author/{id}",
    tag = "author",
    params(("id" = Uuid, Path, description = "The author to retrieve")),
    responses(
        (status = 200, description = "The requested author", body = Author),
        (status = 404, description = "Author not found"),
    ),
)]
pub async fn get_author(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Author>, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    let author = Author::get(&uow, id).await?;
    uow.commit().await?;
    Ok(Json(author))
}

/// Get an author together with its books
#[utoipa::path(
    get,
    path = "/author/{id}/detail",
    tag = "author",
    params(("id" = Uuid, Path, description = "The author to retrieve")),
    responses(
        (status = 200, description = "The author and its books", body = AuthorWithBooks),
        (status = 404, description = "Author not found"),
    ),
)]
pub async fn get_author_detail(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<AuthorWithBooks>, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    let detail = Author::get_with_books(&uow, id).await?;
    uow.commit().await?;
    Ok(Json(detail))
}

/// Update an author, including empty values
///
/// Optional fields missing from the body are reset to null.
#[utoipa::path(
    put,
    path = "/author/{id}",
    tag = "author",
    params(("id" = Uuid, Path, description = "The author to update")),
    request_body = AuthorUpdate,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Author not found"),
    ),
)]
pub async fn put_author(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<AuthorUpdate>,
) -> Result<Json<Author>, ApiError> {
    update_author(&db, id, payload, UpdateMode::Replace).await
}

/// Update an author, ignoring omitted values
#[utoipa::path(
    patch,
    path = "/author/{id}",
    tag = "author",
    params(("id" = Uuid, Path, description = "The author to update")),
    request_body = AuthorUpdate,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Author not found"),
    ),
)]
pub async fn patch_author(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<AuthorUpdate>,
) -> Result<Json<Author>, ApiError> {
    update_author(&db, id, payload, UpdateMode::Merge).await
}

async fn update_author(
    db: &DatabaseConnection,
    id: Uuid,
    payload: AuthorUpdate,
    mode: UpdateMode,
) -> Result<Json<Author>, ApiError> {
    payload.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    let author = Author::update(&uow, id, payload, mode).await?;
    uow.commit().await?;

    Ok(Json(author))
}

/// Delete an author
///
/// Fails with 409 while books still reference the author.
#[utoipa::path(
    delete,
    path = "/author/{id}",
    tag = "author",
    params(("id" = Uuid, Path, description = "The author to delete")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still has books"),
    ),
)]
pub async fn delete_author(
    State(db): State<DatabaseConnection>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let uow = UnitOfWork::begin(&db).await?;
    Author::delete(&uow, id).await?;
    uow.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
