//! `todo_items` table mapping.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

use todoapi_core::EntityId;
use todoapi_todo::TodoItem;

use super::postgres::PgEntity;

impl PgEntity for TodoItem {
    const TABLE: &'static str = "todo_items";

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS todo_items (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            is_complete BOOLEAN NOT NULL DEFAULT FALSE
        )
    "#;

    const COLUMNS: &'static [&'static str] = &["name", "is_complete"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(TodoItem {
            id: EntityId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            is_complete: row.try_get("is_complete")?,
        })
    }

    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query.bind(&self.name).bind(self.is_complete)
    }
}
