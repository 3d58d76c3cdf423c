use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{stats_windows, DiaryStore, StoreResult};
use crate::dto::{AdminStats, Page};
use crate::models::diary::Diary;
use crate::models::flower_image::FlowerImage;
use crate::models::user::User;

#[derive(Debug, Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DiaryStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .map(|_| ())
    }

    async fn create_user(&self, name: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>("INSERT INTO users (name) VALUES ($1) RETURNING *")
            .bind(name)
            .fetch_one(&self.db)
            .await
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC OFFSET $1 LIMIT $2")
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.db)
            .await
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_diary(
        &self,
        user_id: i64,
        content: &str,
        mood: Option<&str>,
    ) -> StoreResult<Diary> {
        sqlx::query_as::<_, Diary>(
            r#"
            INSERT INTO diaries (user_id, content, mood)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(mood)
        .fetch_one(&self.db)
        .await
    }

    async fn get_owned_diary(&self, id: i64, user_id: i64) -> StoreResult<Option<Diary>> {
        sqlx::query_as::<_, Diary>("SELECT * FROM diaries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    async fn list_diaries_for_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Diary>> {
        sqlx::query_as::<_, Diary>(
            r#"
            SELECT * FROM diaries
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.db)
        .await
    }

    async fn list_all_diaries(&self, page: Page) -> StoreResult<Vec<Diary>> {
        sqlx::query_as::<_, Diary>(
            r#"
            SELECT * FROM diaries
            ORDER BY created_at DESC, id DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.db)
        .await
    }

    async fn update_diary(
        &self,
        id: i64,
        user_id: i64,
        content: Option<&str>,
        mood: Option<&str>,
    ) -> StoreResult<Option<Diary>> {
        sqlx::query_as::<_, Diary>(
            r#"
            UPDATE diaries SET
                content = COALESCE($3, content),
                mood = COALESCE($4, mood),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(content)
        .bind(mood)
        .fetch_optional(&self.db)
        .await
    }

    async fn delete_diary(&self, id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM diaries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_flower_image(
        &self,
        diary_id: i64,
        image_url: &str,
        prompt: &str,
    ) -> StoreResult<FlowerImage> {
        sqlx::query_as::<_, FlowerImage>(
            r#"
            INSERT INTO flower_images (diary_id, image_url, prompt)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(diary_id)
        .bind(image_url)
        .bind(prompt)
        .fetch_one(&self.db)
        .await
    }

    async fn get_owned_flower_image(
        &self,
        id: i64,
        user_id: i64,
    ) -> StoreResult<Option<FlowerImage>> {
        sqlx::query_as::<_, FlowerImage>(
            r#"
            SELECT f.* FROM flower_images f
            JOIN diaries d ON d.id = f.diary_id
            WHERE f.id = $1 AND d.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
    }

    async fn list_flower_images(&self, diary_id: i64) -> StoreResult<Vec<FlowerImage>> {
        sqlx::query_as::<_, FlowerImage>(
            r#"
            SELECT * FROM flower_images
            WHERE diary_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(diary_id)
        .fetch_all(&self.db)
        .await
    }

    async fn latest_flower_image(&self, diary_id: i64) -> StoreResult<Option<FlowerImage>> {
        sqlx::query_as::<_, FlowerImage>(
            r#"
            SELECT * FROM flower_images
            WHERE diary_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(diary_id)
        .fetch_optional(&self.db)
        .await
    }

    async fn stats(&self, now: DateTime<Utc>) -> StoreResult<AdminStats> {
        let (month_start, week_ago) = stats_windows(now);

        let (total_users, total_diaries, total_images, monthly_diaries, weekly_diaries) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM diaries),
                    (SELECT COUNT(*) FROM flower_images),
                    (SELECT COUNT(*) FROM diaries WHERE created_at >= $1),
                    (SELECT COUNT(*) FROM diaries WHERE created_at >= $2)
                "#,
            )
            .bind(month_start)
            .bind(week_ago)
            .fetch_one(&self.db)
            .await?;

        Ok(AdminStats {
            total_users,
            total_diaries,
            total_images,
            monthly_diaries,
            weekly_diaries,
        })
    }
}
