//! Persistence collaborator.
//!
//! Three record kinds (users, diaries, flower images) with ownership edges
//! user → diary → image. Deleting an owner removes everything below it.
//! Identities are assigned by the store.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::dto::{AdminStats, Page};
use crate::models::diary::Diary;
use crate::models::flower_image::FlowerImage;
use crate::models::user::User;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait DiaryStore: Send + Sync + fmt::Debug {
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn create_user(&self, name: &str) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>>;
    /// Returns false when no such user existed.
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;

    // Diaries
    async fn insert_diary(&self, user_id: i64, content: &str, mood: Option<&str>)
        -> StoreResult<Diary>;
    async fn get_owned_diary(&self, id: i64, user_id: i64) -> StoreResult<Option<Diary>>;
    /// Newest first.
    async fn list_diaries_for_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Diary>>;
    /// Newest first, across all users.
    async fn list_all_diaries(&self, page: Page) -> StoreResult<Vec<Diary>>;
    /// `None` fields are left unchanged.
    async fn update_diary(
        &self,
        id: i64,
        user_id: i64,
        content: Option<&str>,
        mood: Option<&str>,
    ) -> StoreResult<Option<Diary>>;
    async fn delete_diary(&self, id: i64, user_id: i64) -> StoreResult<bool>;

    // Flower images
    /// Fails if the diary does not exist.
    async fn insert_flower_image(
        &self,
        diary_id: i64,
        image_url: &str,
        prompt: &str,
    ) -> StoreResult<FlowerImage>;
    /// Only returns the image if its diary belongs to `user_id`.
    async fn get_owned_flower_image(&self, id: i64, user_id: i64)
        -> StoreResult<Option<FlowerImage>>;
    /// Newest first.
    async fn list_flower_images(&self, diary_id: i64) -> StoreResult<Vec<FlowerImage>>;
    async fn latest_flower_image(&self, diary_id: i64) -> StoreResult<Option<FlowerImage>>;

    async fn stats(&self, now: DateTime<Utc>) -> StoreResult<AdminStats>;
}

/// Start of the current calendar month (UTC) and the instant seven days ago.
pub(crate) fn stats_windows(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    (month_start, now - Duration::days(7))
}
