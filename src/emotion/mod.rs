pub mod lexicon;
pub mod prompt;

pub use lexicon::{EmotionCategory, DEFAULT_PROMPT};
pub use prompt::derive_prompt;
