//! Schema for the `author` and `book` tables.
//!
//! Applied at startup with `Migrator::up(&db, None)`; the integration tests
//! run the same migrations against an in-memory database.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateAuthorTable), Box::new(CreateBookTable)]
    }
}

pub struct CreateAuthorTable;

impl MigrationName for CreateAuthorTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_author_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateAuthorTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Author::Table)
            .if_not_exists()
            .col(ColumnDef::new(Author::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Author::Name).string().not_null())
            .col(ColumnDef::new(Author::Dob).date().null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Author::Table).to_owned())
            .await
    }
}

pub struct CreateBookTable;

impl MigrationName for CreateBookTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_book_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateBookTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Book::Table)
            .if_not_exists()
            .col(ColumnDef::new(Book::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Book::Title).string().not_null())
            .col(ColumnDef::new(Book::AuthorId).uuid().not_null())
            .col(
                ColumnDef::new(Book::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Book::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_book_author_id")
                    .from(Book::Table, Book::AuthorId)
                    .to(Author::Table, Author::Id),
            )
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_book_author_id")
                    .table(Book::Table)
                    .col(Book::AuthorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Book::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Author {
    Table,
    Id,
    Name,
    Dob,
}

#[derive(DeriveIden)]
enum Book {
    Table,
    Id,
    Title,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}
