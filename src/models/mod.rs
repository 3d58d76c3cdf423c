pub mod diary;
pub mod flower_image;
pub mod user;
