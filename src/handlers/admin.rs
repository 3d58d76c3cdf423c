use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::dto::{AdminDiaryPreview, AdminStats, PageQuery};
use crate::error::{AppError, AppResult};
use crate::models::diary::DiaryWithImage;
use crate::models::user::User;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users(query.page(100, 200)).await?;
    Ok(Json(users))
}

pub async fn user_diaries(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<DiaryWithImage>>> {
    state
        .store
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let diaries = state
        .store
        .list_diaries_for_user(user_id, query.page(50, 200))
        .await?;

    let mut result = Vec::with_capacity(diaries.len());
    for diary in diaries {
        let flower_image = state.store.latest_flower_image(diary.id).await?;
        result.push(DiaryWithImage {
            diary,
            flower_image,
        });
    }

    Ok(Json(result))
}

pub async fn all_diaries(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<AdminDiaryPreview>>> {
    let diaries = state.store.list_all_diaries(query.page(100, 200)).await?;

    let mut result = Vec::with_capacity(diaries.len());
    for diary in diaries {
        let has_image = state.store.latest_flower_image(diary.id).await?.is_some();
        result.push(AdminDiaryPreview::new(diary, has_image));
    }

    Ok(Json(result))
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<AdminStats>> {
    let stats = state.store.stats(Utc::now()).await?;
    Ok(Json(stats))
}
