use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use todoapi_core::{Entity, EntityId};
use todoapi_infra::RepositoryError;
use todoapi_todo::TodoItem;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_todo_items).post(create_todo_item))
        .route(
            "/:id",
            get(get_todo_item)
                .put(update_todo_item)
                .delete(delete_todo_item),
        )
}

fn parse_id(raw: &str) -> Result<EntityId, ApiError> {
    Ok(raw.parse::<EntityId>()?)
}

fn location(id: EntityId) -> String {
    format!("/todoitems/{id}")
}

pub async fn list_todo_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let items = services.todo_items.get_all().await?;
    Ok(Json(items))
}

pub async fn get_todo_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let id = parse_id(&id)?;
    match services.todo_items.get(id).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_todo_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<TodoItem>,
) -> Result<Response, ApiError> {
    let created = services.todo_items.insert(body).await?;
    tracing::info!(id = %created.id(), "todo item created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(created.id()))],
        Json(created),
    )
        .into_response())
}

pub async fn update_todo_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<TodoItem>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    body.ensure_identity(id)?;

    match services.todo_items.update(body).await {
        Ok(()) => {
            tracing::info!(%id, "todo item updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(RepositoryError::RecordMissing { .. }) => Err(ApiError::NotFound),
        Err(RepositoryError::Conflict { id }) => {
            // The record may have been deleted under us; that is just a 404.
            if services.todo_items.get(id).await?.is_none() {
                Err(ApiError::NotFound)
            } else {
                Err(ApiError::Conflict { id })
            }
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_todo_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let id = parse_id(&id)?;
    let Some(item) = services.todo_items.get(id).await? else {
        return Err(ApiError::NotFound);
    };

    services.todo_items.delete(&item).await?;
    tracing::info!(%id, "todo item deleted");
    Ok(Json(item))
}
