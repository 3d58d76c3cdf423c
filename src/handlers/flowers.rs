use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::dto::OwnerQuery;
use crate::error::{AppError, AppResult};
use crate::models::flower_image::{FlowerImage, GenerateFlowerRequest};
use crate::AppState;

/// Generate another flower for an existing diary. Failures are reported.
pub async fn generate_flower(
    State(state): State<AppState>,
    Query(owner): Query<OwnerQuery>,
    Json(body): Json<GenerateFlowerRequest>,
) -> AppResult<(StatusCode, Json<FlowerImage>)> {
    let image = state
        .orchestrator
        .regenerate_image(owner.user_id, body.diary_id)
        .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn list_diary_flowers(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<Vec<FlowerImage>>> {
    state
        .store
        .get_owned_diary(diary_id, owner.user_id)
        .await?
        .ok_or(AppError::NotFound("Diary not found".into()))?;

    let images = state.store.list_flower_images(diary_id).await?;
    Ok(Json(images))
}

pub async fn get_flower(
    State(state): State<AppState>,
    Path(flower_id): Path<i64>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<FlowerImage>> {
    let image = state
        .store
        .get_owned_flower_image(flower_id, owner.user_id)
        .await?
        .ok_or(AppError::NotFound("Flower image not found".into()))?;

    Ok(Json(image))
}
