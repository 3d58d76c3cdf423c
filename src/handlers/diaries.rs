use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::{OwnerPageQuery, OwnerQuery};
use crate::error::{AppError, AppResult};
use crate::models::diary::{CreateDiaryRequest, Diary, DiaryWithImage, UpdateDiaryRequest};
use crate::AppState;

pub async fn create_diary(
    State(state): State<AppState>,
    Json(body): Json<CreateDiaryRequest>,
) -> AppResult<(StatusCode, Json<DiaryWithImage>)> {
    body.validate()?;
    if body.content.trim().is_empty() {
        return Err(AppError::Validation("Diary content is required".into()));
    }

    let created = state
        .orchestrator
        .create_diary_with_image(body.user_id, &body.content, body.mood.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_diaries(
    State(state): State<AppState>,
    Query(query): Query<OwnerPageQuery>,
) -> AppResult<Json<Vec<Diary>>> {
    let diaries = state
        .store
        .list_diaries_for_user(query.user_id, query.page(20, 100))
        .await?;

    Ok(Json(diaries))
}

pub async fn get_diary(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<DiaryWithImage>> {
    let diary = state
        .store
        .get_owned_diary(diary_id, owner.user_id)
        .await?
        .ok_or(AppError::NotFound("Diary not found".into()))?;

    let flower_image = state.store.latest_flower_image(diary.id).await?;

    Ok(Json(DiaryWithImage {
        diary,
        flower_image,
    }))
}

pub async fn update_diary(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
    Json(body): Json<UpdateDiaryRequest>,
) -> AppResult<Json<Diary>> {
    body.validate()?;
    if body.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(AppError::Validation("Diary content cannot be blank".into()));
    }

    let diary = state
        .store
        .update_diary(
            diary_id,
            owner.user_id,
            body.content.as_deref(),
            body.mood.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("Diary not found".into()))?;

    Ok(Json(diary))
}

pub async fn delete_diary(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<StatusCode> {
    if !state.store.delete_diary(diary_id, owner.user_id).await? {
        return Err(AppError::NotFound("Diary not found".into()));
    }

    tracing::info!(diary_id, user_id = owner.user_id, "Diary deleted");
    Ok(StatusCode::NO_CONTENT)
}
