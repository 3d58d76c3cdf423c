pub mod admin;
pub mod diaries;
pub mod flowers;
pub mod health;
pub mod moods;
pub mod users;
