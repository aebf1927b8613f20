//! Generic CRUD boundary between request handlers and storage.
//!
//! Handlers depend only on [`Repository`]; the backend (in-memory for dev/test,
//! Postgres for production) is chosen at bootstrap.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;
mod todo_items;

pub use in_memory::InMemoryRepository;
pub use postgres::{PgEntity, PostgresRepository};
pub use r#trait::{Repository, RepositoryError};
