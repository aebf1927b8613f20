//! Postgres-backed repository implementation.
//!
//! One table per entity type, keyed by a `BIGSERIAL` identity. The table
//! layout for each type comes from its [`PgEntity`] mapping.
//!
//! ## Error Mapping
//!
//! SQLx errors become `RepositoryError::Backend` with the failing operation
//! named in the message. `RecordMissing` and `Conflict` are never produced from
//! SQL errors; they come from row counts:
//!
//! | Step | Outcome | RepositoryError |
//! |------|---------|-----------------|
//! | existence check finds nothing | record absent | `RecordMissing` |
//! | `UPDATE` affects zero rows | record vanished after the check | `Conflict` |
//!
//! ## Thread Safety
//!
//! `PostgresRepository` is `Send + Sync` and shared across requests. All
//! connection handling goes through the SQLx pool.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use tracing::{Span, instrument};

use todoapi_core::{Entity, EntityId};

use super::r#trait::{Repository, RepositoryError};

/// Table mapping for an entity stored by [`PostgresRepository`].
///
/// The identity column is always `id BIGINT`; implementors describe the rest.
pub trait PgEntity: Entity {
    /// Table name.
    const TABLE: &'static str;

    /// `CREATE TABLE IF NOT EXISTS ...` statement for the table.
    const CREATE_TABLE: &'static str;

    /// Non-identity columns, in the order [`PgEntity::bind_columns`] binds them.
    const COLUMNS: &'static [&'static str];

    /// Decode a row selected as `id, <COLUMNS...>`.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    /// Bind the non-identity column values, in [`PgEntity::COLUMNS`] order.
    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments>;
}

/// Postgres-backed repository for one entity type.
///
/// Writes run inside an explicit transaction: committed on success, rolled back
/// on every other exit path (explicitly, or by dropping the transaction).
#[derive(Debug)]
pub struct PostgresRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: PgEntity> PostgresRepository<E> {
    /// Create a repository over the given connection pool.
    ///
    /// The pool is reference-counted internally; clones share connections.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders = (1..=E::COLUMNS.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {table} ({cols}) VALUES ({placeholders}) RETURNING id, {cols}",
            table = E::TABLE,
            cols = E::COLUMNS.join(", "),
        )
    }

    fn update_sql() -> String {
        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, col)| format!("{col} = ${}", idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE id = ${}",
            E::TABLE,
            assignments,
            E::COLUMNS.len() + 1
        )
    }
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PostgresRepository<E> {
    #[instrument(skip(self), fields(table = E::TABLE), err)]
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(E::CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(table = E::TABLE, row_count = tracing::field::Empty), err)]
    async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        let sql = format!("{} ORDER BY id ASC", Self::select_sql());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_all", e))?;

        let entities = rows
            .iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("decode_row", e))?;

        Span::current().record("row_count", entities.len());
        Ok(entities)
    }

    #[instrument(skip(self), fields(table = E::TABLE, id = %id), err)]
    async fn get(&self, id: EntityId) -> Result<Option<E>, RepositoryError> {
        let sql = format!("{} WHERE id = $1", Self::select_sql());
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref()
            .map(E::from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_row", e))
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE, assigned_id = tracing::field::Empty), err)]
    async fn insert(&self, entity: E) -> Result<E, RepositoryError> {
        let sql = Self::insert_sql();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = entity
            .bind_columns(sqlx::query(&sql))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;
        let stored = E::from_row(&row).map_err(|e| map_sqlx_error("decode_row", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("assigned_id", stored.id().get());
        Ok(stored)
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()), err)]
    async fn update(&self, entity: E) -> Result<(), RepositoryError> {
        let id = entity.id();
        let exists_sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1) AS found", E::TABLE);
        let update_sql = Self::update_sql();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let found: bool = sqlx::query(&exists_sql)
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await
            .and_then(|row| row.try_get("found"))
            .map_err(|e| map_sqlx_error("check_exists", e))?;

        if !found {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(RepositoryError::RecordMissing { id });
        }

        let result = entity
            .bind_columns(sqlx::query(&update_sql))
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        // Another writer removed the row after the existence check.
        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(RepositoryError::Conflict { id });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()), err)]
    async fn delete(&self, entity: &E) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(&sql)
            .bind(entity.id().get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!("delete matched no row; already absent");
        }
        Ok(())
    }
}

/// Map SQLx errors to RepositoryError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => RepositoryError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            RepositoryError::Backend(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Backend(format!("timed out acquiring a connection in {operation}"))
        }
        _ => RepositoryError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoapi_todo::TodoItem;

    type Repo = PostgresRepository<TodoItem>;

    #[test]
    fn select_lists_identity_then_columns() {
        assert_eq!(
            Repo::select_sql(),
            "SELECT id, name, is_complete FROM todo_items"
        );
    }

    #[test]
    fn insert_returns_assigned_identity() {
        assert_eq!(
            Repo::insert_sql(),
            "INSERT INTO todo_items (name, is_complete) VALUES ($1, $2) RETURNING id, name, is_complete"
        );
    }

    #[test]
    fn update_binds_identity_last() {
        assert_eq!(
            Repo::update_sql(),
            "UPDATE todo_items SET name = $1, is_complete = $2 WHERE id = $3"
        );
    }

    #[test]
    fn pool_errors_map_to_backend() {
        let err = map_sqlx_error("get", sqlx::Error::PoolClosed);
        match err {
            RepositoryError::Backend(msg) => assert!(msg.contains("get")),
            other => panic!("Expected Backend error, got {other:?}"),
        }
    }
}
