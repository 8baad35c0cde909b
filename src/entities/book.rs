use super::author::{self, Author};
use crate::errors::ApiError;
use crate::traits::{ApplyUpdate, Presence, Repository, UpdateMode, required_field};
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::DatabaseTransaction;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            if self.id.is_not_set() {
                self.id = Set(Uuid::now_v7());
            }
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// A book as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"title": "Book Title", "author_id": "0190a5c4-5d6e-7f00-8a1b-2c3d4e5f6a7b"}))]
pub struct BookCreate {
    pub title: String,
    pub author_id: Uuid,
}

impl From<BookCreate> for ActiveModel {
    fn from(create: BookCreate) -> Self {
        Self {
            id: NotSet,
            title: Set(create.title),
            author_id: Set(create.author_id),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

impl Validatable for BookCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_not_blank("title", &self.title));
        errors.result()
    }
}

/// Many titles by one author, stored in a single unit of work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "title": ["Book Title 1", "Book Title 2", "Book Title 3"],
    "author_id": "0190a5c4-5d6e-7f00-8a1b-2c3d4e5f6a7b"
}))]
pub struct BulkBookCreate {
    pub title: Vec<String>,
    pub author_id: Uuid,
}

impl BulkBookCreate {
    /// One create per title, in input order, all sharing `author_id`
    #[must_use]
    pub fn into_creates(self) -> Vec<BookCreate> {
        let author_id = self.author_id;
        self.title
            .into_iter()
            .map(|title| BookCreate { title, author_id })
            .collect()
    }
}

impl Validatable for BulkBookCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, title) in self.title.iter().enumerate() {
            errors.check(validators::validate_not_blank(&format!("title[{index}]"), title));
        }
        errors.result()
    }
}

/// Fields to change on a book. Omitted and `null` are distinct.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub title: Presence<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub author_id: Presence<Uuid>,
}

impl Validatable for BookUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match &self.title {
            Some(Some(title)) => errors.check(validators::validate_not_blank("title", title)),
            Some(None) => errors.add(ValidationError::new("title", "is required and cannot be null")),
            None => {}
        }
        if self.author_id == Some(None) {
            errors.add(ValidationError::new("author_id", "is required and cannot be null"));
        }
        errors.result()
    }
}

impl ApplyUpdate<ActiveModel> for BookUpdate {
    // every column is required, so both modes only write what was sent
    fn apply_update(
        self,
        mut existing: ActiveModel,
        _mode: UpdateMode,
    ) -> Result<ActiveModel, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match required_field("title", self.title) {
            Ok(Some(title)) => existing.title = Set(title),
            Ok(None) => {}
            Err(error) => errors.add(error),
        }
        match required_field("author_id", self.author_id) {
            Ok(Some(author_id)) => existing.author_id = Set(author_id),
            Ok(None) => {}
            Err(error) => errors.add(error),
        }
        errors.result()?;
        Ok(existing)
    }
}

/// A book with its author inlined
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    pub author: Author,
}

#[async_trait]
impl Repository for Book {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = BookCreate;
    type UpdateModel = BookUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "book";
}

impl Book {
    /// Load a book and its author with a single join
    ///
    /// # Errors
    ///
    /// 404 when no book has this id.
    pub async fn get_with_author(db: &DatabaseTransaction, id: Uuid) -> Result<BookWithAuthor, ApiError> {
        let (model, author) = Entity::find_by_id(id)
            .find_also_related(author::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string())))?;
        let author = author.ok_or_else(|| {
            ApiError::internal(
                "Book references a missing author",
                Some(format!("book {id} has dangling author_id {}", model.author_id)),
            )
        })?;

        Ok(BookWithAuthor {
            book: Self::from(model),
            author: Author::from(author),
        })
    }
}
