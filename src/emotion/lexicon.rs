//! Static emotion lexicon: the closed set of emotion categories, the trigger
//! phrases that vote for each one, and the flower scene prompt it produces.
//!
//! Everything here is compiled into the binary and never mutated. Trigger
//! phrases are stored lower-case; matching is a case-insensitive substring
//! search (see `emotion::prompt`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Joy,
    Sadness,
    Calm,
    Anger,
    Anxiety,
    Love,
    Excitement,
}

impl EmotionCategory {
    /// Declared order. Score ties are resolved in favour of the earlier entry.
    pub const ALL: [EmotionCategory; 7] = [
        EmotionCategory::Joy,
        EmotionCategory::Sadness,
        EmotionCategory::Calm,
        EmotionCategory::Anger,
        EmotionCategory::Anxiety,
        EmotionCategory::Love,
        EmotionCategory::Excitement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Joy => "joy",
            EmotionCategory::Sadness => "sadness",
            EmotionCategory::Calm => "calm",
            EmotionCategory::Anger => "anger",
            EmotionCategory::Anxiety => "anxiety",
            EmotionCategory::Love => "love",
            EmotionCategory::Excitement => "excitement",
        }
    }

    /// Case-insensitive lookup by category name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    pub fn prompt(&self) -> &'static str {
        entry(*self).prompt
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct LexiconEntry {
    pub category: EmotionCategory,
    pub keywords: &'static [&'static str],
    pub prompt: &'static str,
}

/// Used when neither a declared mood nor any trigger phrase selects a category.
pub const DEFAULT_PROMPT: &str = "A beautiful and artistic flower photograph. \
High quality, professional photography, soft natural lighting. \
A gentle bouquet of white daisies and pale pink cosmos in a sunlit meadow, \
bokeh effect, shallow depth of field, artistic composition, warm tones, peaceful atmosphere";

static LEXICON: [LexiconEntry; 7] = [
    LexiconEntry {
        category: EmotionCategory::Joy,
        keywords: &[
            "嬉しい", "うれしい", "楽しい", "幸せ", "喜び", "素敵", "笑顔",
            "happy", "joyful", "glad", "delight",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, bright morning sunlight. \
A field of bright and cheerful sunflowers with golden yellow petals and a few orange roses, \
clear blue sky, vivid saturated colors, uplifting composition, bokeh effect, warm tones, joyful atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Sadness,
        keywords: &[
            "悲しい", "辛い", "寂しい", "切ない", "涙", "落ち込",
            "sad", "lonely", "tears", "cried", "grief",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, soft overcast light after rain. \
Elegant white lilies and blue hydrangeas with dew drops on the petals, \
muted blue and grey palette, quiet minimal composition, shallow depth of field, melancholic yet gentle atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Calm,
        keywords: &[
            "穏やか", "静か", "落ち着", "リラックス", "安らぎ", "のんびり",
            "calm", "peaceful", "relax", "quiet", "serene",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, soft diffused afternoon light. \
Soft pink cherry blossoms and white camellias floating near a still pond, \
pastel pink and pale green palette, balanced open composition, bokeh effect, tranquil atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Anger,
        keywords: &[
            "怒", "腹が立", "イライラ", "いらいら", "むかつ", "許せない",
            "angry", "furious", "annoyed", "frustrat", "mad at",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, dramatic low-key lighting. \
Deep crimson red roses and spiky red spider lilies against a dark background, \
intense red and black palette, bold diagonal composition, strong contrast, fiery atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Anxiety,
        keywords: &[
            "不安", "心配", "緊張", "怖い", "焦",
            "anxious", "worried", "nervous", "afraid", "uneasy",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, misty dawn light. \
Delicate lavender and pale violet sweet peas swaying in soft fog, \
cool lavender and silver palette, airy composition with negative space, soft focus, fragile yet hopeful atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Love,
        keywords: &[
            "愛", "大好き", "感謝", "ありがとう", "恋",
            "love", "grateful", "thankful", "cherish", "adore",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, warm golden hour light. \
A romantic bouquet of pink peonies and soft red ranunculus tied with a silk ribbon, \
rose pink and cream palette, intimate close-up composition, bokeh effect, tender loving atmosphere",
    },
    LexiconEntry {
        category: EmotionCategory::Excitement,
        keywords: &[
            "元気", "ワクワク", "わくわく", "興奮", "情熱", "パワフル", "活発",
            "excited", "thrill", "energetic", "can't wait",
        ],
        prompt: "A beautiful and artistic flower photograph. \
High quality, professional photography, brilliant midday sun. \
Vibrant red tulips and orange marigolds bursting in a dense colorful garden, \
vivid red orange and magenta palette, dynamic energetic composition, crisp detail, lively atmosphere",
    },
];

/// Accepted user-facing mood labels, each mapped to the category it declares.
static MOOD_LABELS: [(&str, EmotionCategory); 8] = [
    ("happy", EmotionCategory::Joy),
    ("sad", EmotionCategory::Sadness),
    ("angry", EmotionCategory::Anger),
    ("anxious", EmotionCategory::Anxiety),
    ("calm", EmotionCategory::Calm),
    ("excited", EmotionCategory::Excitement),
    ("loved", EmotionCategory::Love),
    ("grateful", EmotionCategory::Love),
];

/// All lexicon entries in declared order.
pub fn entries() -> &'static [LexiconEntry] {
    &LEXICON
}

pub fn entry(category: EmotionCategory) -> &'static LexiconEntry {
    // LEXICON is laid out in the same order as EmotionCategory::ALL
    &LEXICON[category as usize]
}

/// Map a declared mood label to its category. Unknown labels yield `None`.
pub fn category_for_mood(label: &str) -> Option<EmotionCategory> {
    let label = label.trim();
    MOOD_LABELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, category)| *category)
}

/// Accepted mood labels and their categories, in display order.
pub fn mood_mappings() -> &'static [(&'static str, EmotionCategory)] {
    &MOOD_LABELS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lexicon_follows_declared_order() {
        for (entry, category) in entries().iter().zip(EmotionCategory::ALL) {
            assert_eq!(entry.category, category);
            assert_eq!(super::entry(category).category, category);
        }
        assert_eq!(entries().len(), EmotionCategory::ALL.len());
    }

    #[test]
    fn test_every_mood_label_maps_into_lexicon() {
        for (label, category) in mood_mappings() {
            assert_eq!(category_for_mood(label), Some(*category));
            assert!(entries().iter().any(|e| e.category == *category));
        }
    }

    #[test]
    fn test_loved_and_grateful_share_love() {
        assert_eq!(category_for_mood("loved"), Some(EmotionCategory::Love));
        assert_eq!(category_for_mood("grateful"), Some(EmotionCategory::Love));
    }

    #[test]
    fn test_mood_lookup_ignores_case_and_whitespace() {
        assert_eq!(category_for_mood("  SAD "), Some(EmotionCategory::Sadness));
        assert_eq!(category_for_mood("Happy"), Some(EmotionCategory::Joy));
        assert_eq!(category_for_mood("melancholy"), None);
        assert_eq!(category_for_mood(""), None);
    }

    #[test]
    fn test_keywords_are_lowercase_and_nonempty() {
        for entry in entries() {
            assert!(!entry.keywords.is_empty(), "{} has no keywords", entry.category);
            for kw in entry.keywords {
                assert!(!kw.is_empty());
                assert_eq!(*kw, kw.to_lowercase(), "keyword {kw:?} must be lower-case");
            }
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        let prompts: HashSet<&str> = entries().iter().map(|e| e.prompt).collect();
        assert_eq!(prompts.len(), entries().len());
        assert!(!prompts.contains(DEFAULT_PROMPT));
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(EmotionCategory::from_name("Joy"), Some(EmotionCategory::Joy));
        assert_eq!(EmotionCategory::from_name(" excitement"), Some(EmotionCategory::Excitement));
        assert_eq!(EmotionCategory::from_name("happy"), None);
    }
}
