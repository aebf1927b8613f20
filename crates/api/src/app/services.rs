use std::sync::Arc;

use anyhow::Context;

use todoapi_infra::{InMemoryRepository, PostgresRepository, Repository, db};
use todoapi_todo::TodoItem;

use crate::config::AppConfig;

/// Storage backend chosen at startup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres,
}

/// Repositories shared by every request handler.
#[derive(Clone)]
pub struct AppServices {
    pub todo_items: Arc<dyn Repository<TodoItem>>,
    pub backend: StorageBackend,
}

impl AppServices {
    pub fn new(todo_items: Arc<dyn Repository<TodoItem>>, backend: StorageBackend) -> Self {
        Self { todo_items, backend }
    }

    /// Dev/test wiring: empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::<TodoItem>::new()), StorageBackend::InMemory)
    }
}

/// Build the repositories from configuration and make sure their storage exists.
///
/// Must complete before the listener accepts traffic.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(url, config.db_max_connections).await?;
            AppServices::new(
                Arc::new(PostgresRepository::<TodoItem>::new(pool)),
                StorageBackend::Postgres,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            AppServices::in_memory()
        }
    };

    services
        .todo_items
        .ensure_schema()
        .await
        .context("failed to create todo_items storage")?;

    tracing::info!(backend = ?services.backend, "storage ready");
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_database_url_uses_in_memory_store() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let services = build_services(&config).await.unwrap();

        assert_eq!(services.backend, StorageBackend::InMemory);
        assert!(services.todo_items.get_all().await.unwrap().is_empty());
    }
}
