//! Deterministic emotion detection and prompt selection.
//!
//! Priority order:
//! 1. a recognised declared mood wins outright,
//! 2. otherwise every category is scored by counting trigger phrase
//!    occurrences in the lower-cased text,
//! 3. the highest score wins, ties go to the category declared first,
//! 4. with no positive score the default prompt is used.
//!
//! All functions here are pure and never fail.

use super::lexicon::{self, EmotionCategory, DEFAULT_PROMPT};

/// Per-category scores in declared order, zero scores omitted.
pub fn score_categories(text: &str) -> Vec<(EmotionCategory, usize)> {
    let text = text.to_lowercase();
    if text.is_empty() {
        return Vec::new();
    }

    lexicon::entries()
        .iter()
        .map(|entry| {
            let score = entry
                .keywords
                .iter()
                .map(|kw| text.matches(*kw).count())
                .sum::<usize>();
            (entry.category, score)
        })
        .filter(|(_, score)| *score > 0)
        .collect()
}

/// Pick the category for a diary entry, or `None` if nothing matched.
pub fn detect_emotion(text: &str, declared_mood: Option<&str>) -> Option<EmotionCategory> {
    if let Some(category) = declared_mood.and_then(lexicon::category_for_mood) {
        return Some(category);
    }

    let mut best: Option<(EmotionCategory, usize)> = None;
    for (category, score) in score_categories(text) {
        // strict comparison keeps the earliest declared category on ties
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((category, score));
        }
    }
    best.map(|(category, _)| category)
}

/// Build the image generation prompt for a diary entry.
pub fn derive_prompt(text: &str, declared_mood: Option<&str>) -> &'static str {
    match detect_emotion(text, declared_mood) {
        Some(category) => category.prompt(),
        None => DEFAULT_PROMPT,
    }
}
