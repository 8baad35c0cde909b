//! Transaction boundary for a single request.
//!
//! Repository operations only stage changes inside a [`UnitOfWork`]. Nothing
//! is durable until [`UnitOfWork::commit`] is called; dropping the handle on
//! any other path (an early `?` return included) rolls the transaction back.
//!
//! ```rust,ignore
//! let uow = UnitOfWork::begin(&db).await?;
//! let author = Author::add(&uow, payload).await?;
//! uow.commit().await?;
//! ```

use crate::errors::ApiError;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::ops::Deref;

pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Open a new transaction on `db`
    ///
    /// # Errors
    ///
    /// Returns a 500 error when the connection pool cannot start a transaction.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ApiError> {
        let txn = db.begin().await.map_err(ApiError::database)?;
        tracing::debug!("unit of work started");
        Ok(Self { txn })
    }

    /// Make every staged change durable
    ///
    /// # Errors
    ///
    /// Constraint violations deferred to commit time surface here as 409.
    pub async fn commit(self) -> Result<(), ApiError> {
        self.txn.commit().await?;
        tracing::debug!("unit of work committed");
        Ok(())
    }

    /// Discard every staged change
    ///
    /// # Errors
    ///
    /// Returns a 500 error when the rollback statement itself fails.
    pub async fn rollback(self) -> Result<(), ApiError> {
        self.txn.rollback().await.map_err(ApiError::database)?;
        tracing::debug!("unit of work rolled back");
        Ok(())
    }
}

impl Deref for UnitOfWork {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.txn
    }
}
