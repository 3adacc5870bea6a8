//! In-memory implementation of the to-do REST contract the component
//! consumes. Used by the component's integration tests and for manual runs.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub name: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
}

/// Insertion-ordered store so listings come back in creation order.
pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    Json(
        todos
            .iter()
            .filter(|t| params.completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect(),
    )
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: Uuid::new_v4(),
        name: input.name,
        completed: input.completed,
    };
    db.write().await.push(todo.clone());
    tracing::debug!(id = %todo.id, "todo created");
    (StatusCode::CREATED, Json(todo))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let todo = todos.iter_mut().find(|t| t.id == id).ok_or(StatusCode::NOT_FOUND)?;
    todo.name = input.name;
    todo.completed = input.completed;
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> StatusCode {
    let mut todos = db.write().await;
    match todos.iter().position(|t| t.id == id) {
        Some(idx) => {
            todos.remove(idx);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
