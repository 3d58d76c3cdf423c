use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FlowerImage {
    pub id: i64,
    pub diary_id: i64,
    pub image_url: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFlowerRequest {
    pub diary_id: i64,
}
