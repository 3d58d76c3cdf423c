//! Diary creation with best-effort flower generation.
//!
//! A diary entry is committed before any image work starts and is never
//! rolled back. During creation, image generation or image persistence
//! failures are logged and the diary is returned without an image. Explicit
//! regeneration has nothing to protect, so there the same failures are
//! returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::error::{AppError, AppResult};
use crate::models::diary::{Diary, DiaryWithImage};
use crate::models::flower_image::FlowerImage;
use crate::services::emotion_analyzer::EmotionAnalyzer;
use crate::services::image_generator::{GenerationError, ImageGenerator};
use crate::store::DiaryStore;

/// Why a flower could not be produced for a diary.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Generator(#[from] GenerationError),

    #[error("failed to save flower image: {0}")]
    Persist(#[from] sqlx::Error),
}

impl From<GenerationFailure> for AppError {
    fn from(failure: GenerationFailure) -> Self {
        match failure {
            GenerationFailure::Generator(e) => AppError::Generation(e),
            GenerationFailure::Persist(e) => AppError::Database(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowerOrchestrator {
    store: Arc<dyn DiaryStore>,
    generator: Arc<dyn ImageGenerator>,
    analyzer: Arc<EmotionAnalyzer>,
    timeout: Duration,
}

impl FlowerOrchestrator {
    pub fn new(
        store: Arc<dyn DiaryStore>,
        generator: Arc<dyn ImageGenerator>,
        analyzer: Arc<EmotionAnalyzer>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            analyzer,
            timeout,
        }
    }

    /// Create a diary entry and try to attach a flower to it.
    ///
    /// Only a missing user or a failure to save the diary itself is an error.
    pub async fn create_diary_with_image(
        &self,
        user_id: i64,
        content: &str,
        mood: Option<&str>,
    ) -> AppResult<DiaryWithImage> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }

        let diary = self.store.insert_diary(user_id, content, mood).await?;
        tracing::info!(diary_id = diary.id, user_id, "Diary created");

        let flower_image = match self.generate_for(&diary).await {
            Ok(image) => Some(image),
            Err(failure) => {
                tracing::warn!(
                    diary_id = diary.id,
                    user_id,
                    error = %failure,
                    "Flower generation failed, diary saved without image"
                );
                None
            }
        };

        Ok(DiaryWithImage {
            diary,
            flower_image,
        })
    }

    /// Generate an additional flower for an existing diary owned by `user_id`.
    pub async fn regenerate_image(&self, user_id: i64, diary_id: i64) -> AppResult<FlowerImage> {
        let diary = self
            .store
            .get_owned_diary(diary_id, user_id)
            .await?
            .ok_or(AppError::NotFound("Diary not found".into()))?;

        let image = self.generate_for(&diary).await?;
        Ok(image)
    }

    async fn generate_for(&self, diary: &Diary) -> Result<FlowerImage, GenerationFailure> {
        let prompt = self
            .analyzer
            .prompt_for(&diary.content, diary.mood.as_deref())
            .await;

        let image_url = tokio::time::timeout(self.timeout, self.generator.generate(prompt, diary.id))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let image = self
            .store
            .insert_flower_image(diary.id, &image_url, prompt)
            .await?;

        tracing::info!(
            diary_id = diary.id,
            flower_image_id = image.id,
            provider = self.generator.provider_name(),
            "Flower image generated"
        );
        Ok(image)
    }
}
