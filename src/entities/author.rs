use super::book::{self, Book};
use crate::errors::ApiError;
use crate::traits::{ApplyUpdate, Presence, Repository, UpdateMode, optional_field, required_field};
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseTransaction, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "author")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub dob: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Book,
}

impl Related<book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.id.is_not_set() {
            self.id = Set(Uuid::now_v7());
        }
        Ok(self)
    }
}

/// An author as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub dob: Option<NaiveDate>,
}

impl From<Model> for Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            dob: model.dob,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"name": "Jane Doe", "dob": "1970-01-31"}))]
pub struct AuthorCreate {
    pub name: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
}

impl From<AuthorCreate> for ActiveModel {
    fn from(create: AuthorCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name),
            dob: create.dob.map_or(NotSet, |dob| Set(Some(dob))),
        }
    }
}

impl Validatable for AuthorCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_not_blank("name", &self.name));
        errors.result()
    }
}

/// Fields to change on an author. Omitted and `null` are distinct.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub name: Presence<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Presence<NaiveDate>,
}

impl Validatable for AuthorUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match &self.name {
            Some(Some(name)) => errors.check(validators::validate_not_blank("name", name)),
            Some(None) => errors.add(ValidationError::new("name", "is required and cannot be null")),
            None => {}
        }
        errors.result()
    }
}

impl ApplyUpdate<ActiveModel> for AuthorUpdate {
    fn apply_update(
        self,
        mut existing: ActiveModel,
        mode: UpdateMode,
    ) -> Result<ActiveModel, ValidationErrors> {
        if let Some(name) = required_field("name", self.name)? {
            existing.name = Set(name);
        }
        if let Some(dob) = optional_field(self.dob, mode) {
            existing.dob = Set(dob);
        }
        Ok(existing)
    }
}

/// An author with every book that references it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

#[async_trait]
impl Repository for Author {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = AuthorCreate;
    type UpdateModel = AuthorUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "author";
}

impl Author {
    /// Load an author together with its books, oldest first
    ///
    /// # Errors
    ///
    /// 404 when no author has this id.
    pub async fn get_with_books(db: &DatabaseTransaction, id: Uuid) -> Result<AuthorWithBooks, ApiError> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string())))?;
        let books = model
            .find_related(book::Entity)
            .order_by_asc(book::Column::Id)
            .all(db)
            .await?;

        Ok(AuthorWithBooks {
            author: Self::from(model),
            books: books.into_iter().map(Book::from).collect(),
        })
    }
}
