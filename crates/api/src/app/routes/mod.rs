use axum::Router;

pub mod system;
pub mod todo_items;

/// Router for every resource endpoint.
pub fn router() -> Router {
    Router::new().nest("/todoitems", todo_items::router())
}
