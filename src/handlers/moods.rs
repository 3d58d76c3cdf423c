use axum::Json;
use serde::Serialize;

use crate::emotion::lexicon::{self, EmotionCategory};

#[derive(Debug, Serialize)]
pub struct MoodOption {
    pub mood: &'static str,
    pub category: EmotionCategory,
}

/// Declared moods the prompt engine recognises. Other values are stored but ignored.
pub async fn list_moods() -> Json<Vec<MoodOption>> {
    let moods = lexicon::mood_mappings()
        .iter()
        .map(|&(mood, category)| MoodOption { mood, category })
        .collect();
    Json(moods)
}
