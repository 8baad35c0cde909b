//! Persistence models and API shapes, one module per entity.
//!
//! Each module holds the `SeaORM` entity (`Model`, `Relation`, `ActiveModel`
//! behaviour), the Read shape the [`Repository`](crate::traits::Repository) is
//! implemented on, and its Create/Update shapes.

pub mod author;
pub mod book;

pub use author::{Author, AuthorCreate, AuthorUpdate, AuthorWithBooks};
pub use book::{Book, BookCreate, BookUpdate, BookWithAuthor, BulkBookCreate};
