//! Axum-specific tag routes.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use taskforge_adapters::JwtConfig;
use taskforge_application::TodoService;
use taskforge_core::{TagStore, TodoStore};

use crate::error::ApiError;
use crate::extract::authenticate;

#[tracing::instrument(name = "List tags", skip_all)]
pub async fn list_tags<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tags = TodoService::new(todo_store, tag_store)
        .all_tags(payload.user_id)
        .await?;
    Ok(Json(tags))
}

#[tracing::instrument(name = "List used tags", skip_all)]
pub async fn used_tags<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tags = TodoService::new(todo_store, tag_store)
        .used_tags(payload.user_id)
        .await?;
    Ok(Json(tags))
}

#[tracing::instrument(name = "List unused tags", skip_all)]
pub async fn unused_tags<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tags = TodoService::new(todo_store, tag_store)
        .unused_tags(payload.user_id)
        .await?;
    Ok(Json(tags))
}

#[tracing::instrument(name = "Find todos by tag", skip_all, fields(name))]
pub async fn todos_by_tag<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let todos = TodoService::new(todo_store, tag_store)
        .find_by_tag(&name, payload.user_id)
        .await?;
    Ok(Json(todos))
}

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[tracing::instrument(name = "Create tag", skip_all)]
pub async fn create_tag<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Json(request): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tag = TodoService::new(todo_store, tag_store)
        .create_tag(&request.name, payload.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[tracing::instrument(name = "Delete tag by id", skip_all, fields(id))]
pub async fn delete_tag_by_id<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tag = TodoService::new(todo_store, tag_store)
        .delete_tag(id, payload.user_id)
        .await?;
    Ok(Json(tag))
}

#[tracing::instrument(name = "Delete tag by name", skip_all, fields(name))]
pub async fn delete_tag_by_name<T, G>(
    State((todo_store, tag_store, jwt_config)): State<(T, G, JwtConfig)>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    T: TodoStore + Clone + 'static,
    G: TagStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;
    let tag = TodoService::new(todo_store, tag_store)
        .delete_tag_by_name(&name, payload.user_id)
        .await?;
    Ok(Json(tag))
}
