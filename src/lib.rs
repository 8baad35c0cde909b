pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod extract;
pub mod migration;
pub mod pagination;
pub mod routes;
pub mod traits;
pub mod unit_of_work;
pub mod validation;

pub use errors::ApiError;
pub use traits::{Repository, UpdateMode};
pub use unit_of_work::UnitOfWork;
