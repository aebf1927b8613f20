//! Infrastructure layer: storage backends behind the repository contract.

pub mod db;
pub mod repository;

pub use repository::{InMemoryRepository, PgEntity, PostgresRepository, Repository, RepositoryError};
