//! Postgres repository against a live database.
//!
//! Runs only when `DATABASE_URL` is set; otherwise every test returns early.

use todoapi_core::{Entity, EntityId};
use todoapi_infra::{PostgresRepository, Repository, RepositoryError, db};
use todoapi_todo::TodoItem;

async fn repo() -> Option<PostgresRepository<TodoItem>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = db::connect(&url, 2).await.expect("failed to connect");
    let repo = PostgresRepository::new(pool);
    repo.ensure_schema().await.expect("failed to ensure schema");
    Some(repo)
}

#[tokio::test]
async fn insert_then_get_round_trips_through_the_table() {
    let Some(repo) = repo().await else { return };

    let stored = repo
        .insert(TodoItem::new("pg insert").with_id(EntityId::new(-5)))
        .await
        .unwrap();

    assert!(stored.id.get() > 0);
    assert_eq!(stored.name, "pg insert");
    assert_eq!(repo.get(stored.id).await.unwrap(), Some(stored.clone()));

    repo.delete(&stored).await.unwrap();
}

#[tokio::test]
async fn update_overwrites_and_missing_rows_are_reported() {
    let Some(repo) = repo().await else { return };

    let stored = repo.insert(TodoItem::new("pg update")).await.unwrap();
    let replacement = TodoItem {
        id: stored.id,
        name: "pg updated".to_string(),
        is_complete: true,
    };
    repo.update(replacement.clone()).await.unwrap();
    assert_eq!(repo.get(stored.id).await.unwrap(), Some(replacement.clone()));

    repo.delete(&replacement).await.unwrap();
    let err = repo.update(replacement).await.unwrap_err();
    assert!(matches!(err, RepositoryError::RecordMissing { id } if id == stored.id));
}

#[tokio::test]
async fn delete_twice_is_a_no_op() {
    let Some(repo) = repo().await else { return };

    let stored = repo.insert(TodoItem::new("pg delete")).await.unwrap();
    repo.delete(&stored).await.unwrap();
    repo.delete(&stored).await.unwrap();

    assert_eq!(repo.get(stored.id).await.unwrap(), None);
    assert!(repo.get_all().await.unwrap().iter().all(|item| item.id != stored.id));
}
