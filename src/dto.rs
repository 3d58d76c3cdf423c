//! # Flower Diary — shared Request/Response DTOs
//!
//! Types that are not tied to a single table live here: pagination and
//! ownership query parameters, delete confirmations, and the admin views.
//!
//! Conventions:
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Serde defaults are used for optional fields with known defaults

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::diary::Diary;

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i64,
}

/// `?user_id=` — identifies the owner until authentication exists.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: i64,
}

/// `?user_id=&skip=&limit=` for per-user listings.
#[derive(Debug, Deserialize)]
pub struct OwnerPageQuery {
    pub user_id: i64,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

impl OwnerPageQuery {
    pub fn page(&self, default_limit: i64, max_limit: i64) -> Page {
        Page::new(self.skip, self.limit, default_limit, max_limit)
    }
}

/// `?skip=&limit=` for admin listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn page(&self, default_limit: i64, max_limit: i64) -> Page {
        Page::new(self.skip, self.limit, default_limit, max_limit)
    }
}

/// Normalised offset/limit pair handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: i64, limit: Option<i64>, default_limit: i64, max_limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

const PREVIEW_CHARS: usize = 100;

/// GET /api/v1/admin/diaries — truncated listing row
#[derive(Debug, Serialize)]
pub struct AdminDiaryPreview {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_image: bool,
}

impl AdminDiaryPreview {
    pub fn new(diary: Diary, has_image: bool) -> Self {
        Self {
            id: diary.id,
            user_id: diary.user_id,
            content: preview(&diary.content),
            mood: diary.mood,
            created_at: diary.created_at,
            updated_at: diary.updated_at,
            has_image,
        }
    }
}

/// Truncate on character boundaries; diary text is frequently Japanese.
fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// GET /api/v1/admin/stats
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_diaries: i64,
    pub total_images: i64,
    pub monthly_diaries: i64,
    pub weekly_diaries: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamps_limit_and_skip() {
        assert_eq!(Page::new(-5, None, 20, 100), Page { skip: 0, limit: 20 });
        assert_eq!(Page::new(3, Some(0), 20, 100), Page { skip: 3, limit: 1 });
        assert_eq!(Page::new(0, Some(1000), 20, 100), Page { skip: 0, limit: 100 });
    }

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(preview("短い日記"), "短い日記");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "花".repeat(150);
        let out = preview(&long);
        assert_eq!(out.chars().count(), PREVIEW_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_owner_page_query_defaults() {
        let q: OwnerPageQuery = serde_json::from_str(r#"{"user_id": 7}"#).unwrap();
        assert_eq!(q.user_id, 7);
        assert_eq!(q.page(20, 100), Page { skip: 0, limit: 20 });
    }
}
