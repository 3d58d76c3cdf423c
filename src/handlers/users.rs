use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::{DeleteResponse, PageQuery};
use crate::error::{AppError, AppResult};
use crate::models::user::{CreateUserRequest, User};
use crate::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    insert_user(&state, body).await
}

/// `POST /users?name=...`, kept for clients that send the name as a query parameter.
pub async fn create_user_from_query(
    State(state): State<AppState>,
    Query(params): Query<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    insert_user(&state, params).await
}

async fn insert_user(
    state: &AppState,
    body: CreateUserRequest,
) -> AppResult<(StatusCode, Json<User>)> {
    body.validate()?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("User name is required".into()));
    }

    let user = state.store.create_user(name).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users(query.page(100, 200)).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

/// Removes the user together with all of their diaries and flowers.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    if !state.store.delete_user(user_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!(user_id, "User deleted");
    Ok(Json(DeleteResponse {
        deleted: true,
        id: user_id,
    }))
}
