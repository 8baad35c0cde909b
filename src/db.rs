use crate::config::Config;
use crate::migration::Migrator;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Connect to the configured database and bring its schema up to date
///
/// # Errors
///
/// Fails when the database is unreachable or a migration cannot be applied.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.connect_options()).await?;
    Migrator::up(&db, None).await?;
    tracing::info!(backend = ?db.get_database_backend(), "database ready");
    Ok(db)
}
