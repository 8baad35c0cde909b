use crate::errors::ApiError;
use crate::pagination::LimitOffset;
use crate::validation::{ValidationError, ValidationErrors};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryOrder, QuerySelect,
};
use uuid::Uuid;

/// How an Update shape is applied to a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: optional fields that are not supplied are reset to null.
    ///
    /// Easy to misuse, since a client that sends only the field it wants to
    /// change silently clears every other optional field.
    Replace,
    /// PATCH: only the fields present in the body are written.
    Merge,
}

/// Update-shape field: `None` when omitted, `Some(None)` for an explicit null.
///
/// Deserialize with `serde_with::rust::double_option` so the two cases stay
/// distinct.
pub type Presence<T> = Option<Option<T>>;

/// Resolve a non-nullable column. Returns the value to write, if any.
///
/// Required columns have no default, so an omitted value is left untouched in
/// both modes and an explicit null is rejected.
///
/// # Errors
///
/// Fails when the field is present but null.
pub fn required_field<T>(field: &str, value: Presence<T>) -> Result<Option<T>, ValidationError> {
    match value {
        Some(Some(value)) => Ok(Some(value)),
        Some(None) => Err(ValidationError::new(field, "is required and cannot be null")),
        None => Ok(None),
    }
}

/// Resolve a nullable column. Returns the value to write, if any.
#[must_use]
pub fn optional_field<T>(value: Presence<T>, mode: UpdateMode) -> Option<Option<T>> {
    match (value, mode) {
        (Some(value), _) => Some(value),
        (None, UpdateMode::Replace) => Some(None),
        (None, UpdateMode::Merge) => None,
    }
}

pub trait ApplyUpdate<ActiveModelType> {
    /// Write this update into the active model loaded from storage
    ///
    /// # Errors
    ///
    /// Returns every field that cannot be applied.
    fn apply_update(
        self,
        existing: ActiveModelType,
        mode: UpdateMode,
    ) -> Result<ActiveModelType, ValidationErrors>;
}

/// Data-access contract shared by every entity.
///
/// Implemented on the Read shape of an entity. All operations run against the
/// transaction of a [`UnitOfWork`](crate::unit_of_work::UnitOfWork) and only
/// stage their changes until that unit of work is committed.
#[async_trait]
pub trait Repository: Sized + Send + Sync
where
    Self::EntityType: EntityTrait + Sync,
    Self::ActiveModelType: ActiveModelTrait + ActiveModelBehavior + Send + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModelType>,
    <<Self::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: Into<Self::ActiveModelType> + Send;
    type UpdateModel: ApplyUpdate<Self::ActiveModelType> + Send;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;

    /// Column giving the stable listing order.
    ///
    /// Identities are time-ordered UUIDs, so the primary key follows insertion
    /// order.
    #[must_use]
    fn default_order_column() -> Self::ColumnType {
        Self::ID_COLUMN
    }

    async fn get(db: &DatabaseTransaction, id: Uuid) -> Result<Self, ApiError> {
        let model = Self::EntityType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string())))?;
        Ok(Self::from(model))
    }

    async fn add(db: &DatabaseTransaction, create_model: Self::CreateModel) -> Result<Self, ApiError> {
        let active_model: Self::ActiveModelType = create_model.into();
        let model = active_model.insert(db).await?;
        tracing::debug!(resource = Self::RESOURCE_NAME_SINGULAR, "row staged for insert");
        Ok(Self::from(model))
    }

    /// Insert every model in order; the first failure aborts the batch
    async fn add_many(
        db: &DatabaseTransaction,
        create_models: Vec<Self::CreateModel>,
    ) -> Result<Vec<Self>, ApiError> {
        let mut stored = Vec::with_capacity(create_models.len());
        for create_model in create_models {
            stored.push(Self::add(db, create_model).await?);
        }
        Ok(stored)
    }

    async fn update(
        db: &DatabaseTransaction,
        id: Uuid,
        update_model: Self::UpdateModel,
        mode: UpdateMode,
    ) -> Result<Self, ApiError> {
        let model = Self::EntityType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string())))?;
        let existing: Self::ActiveModelType = model.clone().into_active_model();
        let updated_model = update_model.apply_update(existing, mode)?;

        // nothing to write, skip the UPDATE so audit columns keep their value
        if !updated_model.is_changed() {
            return Ok(Self::from(model));
        }

        let updated = updated_model.update(db).await?;
        tracing::debug!(resource = Self::RESOURCE_NAME_SINGULAR, %id, ?mode, "row staged for update");
        Ok(Self::from(updated))
    }

    async fn delete(db: &DatabaseTransaction, id: Uuid) -> Result<Uuid, ApiError> {
        let res = Self::EntityType::delete_by_id(id).exec(db).await?;
        match res.rows_affected {
            0 => Err(ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string()))),
            _ => {
                tracing::debug!(resource = Self::RESOURCE_NAME_SINGULAR, %id, "row staged for delete");
                Ok(id)
            }
        }
    }

    /// One page of rows in insertion order, plus the unpaginated row count
    async fn list_and_count(
        db: &DatabaseTransaction,
        page: LimitOffset,
    ) -> Result<(Vec<Self>, u64), ApiError> {
        let models = Self::EntityType::find()
            .order_by_asc(Self::default_order_column())
            .offset(page.offset)
            .limit(page.limit)
            .all(db)
            .await?;
        let total = PaginatorTrait::count(Self::EntityType::find(), db).await?;
        Ok((models.into_iter().map(Self::from).collect(), total))
    }
}
