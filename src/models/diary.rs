use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::flower_image::FlowerImage;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Diary {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    /// Free-form label as submitted. Only recognised labels affect the prompt.
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDiaryRequest {
    pub user_id: i64,
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDiaryRequest {
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
    pub mood: Option<String>,
}

/// A diary together with the most recently generated flower, if any.
#[derive(Debug, Clone, Serialize)]
pub struct DiaryWithImage {
    #[serde(flatten)]
    pub diary: Diary,
    pub flower_image: Option<FlowerImage>,
}
