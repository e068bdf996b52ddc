//! Axum-specific todo routes. All of them operate on the authenticated
//! user's own todos.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use taskforge_adapters::JwtConfig;
use taskforge_application::TodoService;
use taskforge_core::{NewTodo, TagStore, TodoPatch, TodoStore};

use crate::error::ApiError;
use crate::extract::authenticate;

#[tracing::instrument(name = "List todos", skip_all)]
pub async fn list_todos<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todos = TodoService::new(todo_store, tag_store)
        .list(payload.user_id)
        .await?;
    Ok(Json(todos))
}

#[tracing::instrument(name = "Get todo", skip_all, fields(id))]
pub async fn get_todo<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todo = TodoService::new(todo_store, tag_store)
        .get(id, payload.user_id)
        .await?;
    Ok(Json(todo))
}

#[tracing::instrument(name = "Create todo", skip_all)]
pub async fn create_todo<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Json(request): Json<NewTodo>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todo = TodoService::new(todo_store, tag_store)
        .create(payload.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[tracing::instrument(name = "Update todo", skip_all, fields(id))]
pub async fn update_todo<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<TodoPatch>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todo = TodoService::new(todo_store, tag_store)
        .update(id, payload.user_id, request)
        .await?;
    Ok(Json(todo))
}

#[tracing::instrument(name = "Delete todo", skip_all, fields(id))]
pub async fn delete_todo<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todo = TodoService::new(todo_store, tag_store)
        .remove(id, payload.user_id)
        .await?;
    Ok(Json(todo))
}

#[tracing::instrument(name = "Complete todo", skip_all, fields(id))]
pub async fn complete_todo<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todo = TodoService::new(todo_store, tag_store)
        .complete(id, payload.user_id)
        .await?;
    Ok(Json(todo))
}
