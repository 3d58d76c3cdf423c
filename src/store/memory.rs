//! In-process store used when no `DATABASE_URL` is configured, and by tests.
//! Data is lost when the process exits.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{stats_windows, DiaryStore, StoreResult};
use crate::dto::{AdminStats, Page};
use crate::models::diary::Diary;
use crate::models::flower_image::FlowerImage;
use crate::models::user::User;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    diaries: BTreeMap<i64, Diary>,
    flower_images: BTreeMap<i64, FlowerImage>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    reject_flower_images: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent flower image insert fail.
    #[cfg(test)]
    pub fn reject_flower_images(&self) {
        self.reject_flower_images.store(true, Ordering::SeqCst);
    }

    /// Total number of image rows, for assertions in tests.
    #[cfg(test)]
    pub async fn flower_image_count(&self) -> usize {
        self.tables.lock().await.flower_images.len()
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, i64),
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl DiaryStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, name: &str) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        let user = User {
            id: tables.next_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        let users = self.tables.lock().await.users.values().cloned().collect();
        Ok(paginate(users, page))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = tables
            .diaries
            .values()
            .filter(|d| d.user_id == id)
            .map(|d| d.id)
            .collect();
        for diary_id in owned {
            tables.diaries.remove(&diary_id);
            tables.flower_images.retain(|_, f| f.diary_id != diary_id);
        }
        Ok(true)
    }

    async fn insert_diary(
        &self,
        user_id: i64,
        content: &str,
        mood: Option<&str>,
    ) -> StoreResult<Diary> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&user_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        let now = Utc::now();
        let diary = Diary {
            id: tables.next_id(),
            user_id,
            content: content.to_string(),
            mood: mood.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        tables.diaries.insert(diary.id, diary.clone());
        Ok(diary)
    }

    async fn get_owned_diary(&self, id: i64, user_id: i64) -> StoreResult<Option<Diary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .diaries
            .get(&id)
            .filter(|d| d.user_id == user_id)
            .cloned())
    }

    async fn list_diaries_for_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Diary>> {
        let mut diaries: Vec<Diary> = self
            .tables
            .lock()
            .await
            .diaries
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut diaries, |d| (d.created_at, d.id));
        Ok(paginate(diaries, page))
    }

    async fn list_all_diaries(&self, page: Page) -> StoreResult<Vec<Diary>> {
        let mut diaries: Vec<Diary> = self.tables.lock().await.diaries.values().cloned().collect();
        newest_first(&mut diaries, |d| (d.created_at, d.id));
        Ok(paginate(diaries, page))
    }

    async fn update_diary(
        &self,
        id: i64,
        user_id: i64,
        content: Option<&str>,
        mood: Option<&str>,
    ) -> StoreResult<Option<Diary>> {
        let mut tables = self.tables.lock().await;
        let Some(diary) = tables.diaries.get_mut(&id).filter(|d| d.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(content) = content {
            diary.content = content.to_string();
        }
        if let Some(mood) = mood {
            diary.mood = Some(mood.to_string());
        }
        diary.updated_at = Utc::now();
        Ok(Some(diary.clone()))
    }

    async fn delete_diary(&self, id: i64, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .diaries
            .get(&id)
            .map_or(false, |d| d.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        tables.diaries.remove(&id);
        tables.flower_images.retain(|_, f| f.diary_id != id);
        Ok(true)
    }

    async fn insert_flower_image(
        &self,
        diary_id: i64,
        image_url: &str,
        prompt: &str,
    ) -> StoreResult<FlowerImage> {
        if self.reject_flower_images.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolClosed);
        }
        let mut tables = self.tables.lock().await;
        if !tables.diaries.contains_key(&diary_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        let image = FlowerImage {
            id: tables.next_id(),
            diary_id,
            image_url: image_url.to_string(),
            prompt: prompt.to_string(),
            created_at: Utc::now(),
        };
        tables.flower_images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn get_owned_flower_image(
        &self,
        id: i64,
        user_id: i64,
    ) -> StoreResult<Option<FlowerImage>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .flower_images
            .get(&id)
            .filter(|f| {
                tables
                    .diaries
                    .get(&f.diary_id)
                    .map_or(false, |d| d.user_id == user_id)
            })
            .cloned())
    }

    async fn list_flower_images(&self, diary_id: i64) -> StoreResult<Vec<FlowerImage>> {
        let mut images: Vec<FlowerImage> = self
            .tables
            .lock()
            .await
            .flower_images
            .values()
            .filter(|f| f.diary_id == diary_id)
            .cloned()
            .collect();
        newest_first(&mut images, |f| (f.created_at, f.id));
        Ok(images)
    }

    async fn latest_flower_image(&self, diary_id: i64) -> StoreResult<Option<FlowerImage>> {
        Ok(self.list_flower_images(diary_id).await?.into_iter().next())
    }

    async fn stats(&self, now: DateTime<Utc>) -> StoreResult<AdminStats> {
        let (month_start, week_ago) = stats_windows(now);
        let tables = self.tables.lock().await;
        let count_since =
            |since: DateTime<Utc>| tables.diaries.values().filter(|d| d.created_at >= since).count() as i64;

        Ok(AdminStats {
            total_users: tables.users.len() as i64,
            total_diaries: tables.diaries.len() as i64,
            total_images: tables.flower_images.len() as i64,
            monthly_diaries: count_since(month_start),
            weekly_diaries: count_since(week_ago),
        })
    }
}
