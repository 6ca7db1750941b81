//! Tokenization and word normalization
//!
//! Both training and inference run text through the same [`TextNormalizer`]
//! so that vocabulary indices line up.

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Punctuation tokens dropped when building the vocabulary
pub const IGNORE_TOKENS: [&str; 6] = ["?", "!", ".", ",", ":", ";"];

/// Clitic suffixes split off the preceding word ("don't" → "do", "n't")
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ll", "'ve", "'m", "'d"];

/// Reduces a lower-cased word to its dictionary base form
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

/// Rule-based English noun lemmatizer
///
/// Irregular plurals come from a fixed table; regular plurals lose their
/// suffix. Words of three characters or fewer are returned unchanged.
pub struct RuleLemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("wolves", "wolf"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
];

/// Words ending in "s" that are not plurals
const INVARIANT: &[&str] = &[
    "always", "perhaps", "thanks", "news", "series", "species", "this", "does", "yes", "whereas",
    "across", "towards", "afterwards", "sometimes", "besides",
];

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self {
            irregular: IRREGULAR_PLURALS.iter().copied().collect(),
        }
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if word.chars().count() <= 3 || INVARIANT.contains(&word) {
            return word.to_string();
        }

        const SUFFIX_RULES: [(&str, &str); 6] = [
            ("ies", "y"),
            ("sses", "ss"),
            ("shes", "sh"),
            ("ches", "ch"),
            ("xes", "x"),
            ("zes", "z"),
        ];
        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{}{}", stem, replacement);
            }
        }

        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) if stem.chars().all(char::is_alphabetic) => stem.to_string(),
            _ => word.to_string(),
        }
    }
}

/// Split text into word and punctuation tokens
///
/// Uses Unicode word boundaries; whitespace is discarded, punctuation is kept
/// as separate tokens and trailing clitics are split from their word.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for segment in text.split_word_bounds() {
        if segment.chars().all(char::is_whitespace) {
            continue;
        }
        match split_clitic(segment) {
            Some((word, clitic)) => {
                tokens.push(word.to_string());
                tokens.push(clitic.to_string());
            }
            None => tokens.push(segment.to_string()),
        }
    }
    tokens
}

fn split_clitic(segment: &str) -> Option<(&str, &str)> {
    let normalized = segment.replace('\u{2019}', "'").to_lowercase();
    for clitic in CLITICS {
        if normalized.len() > clitic.len() && normalized.ends_with(clitic) {
            // Lower-casing and the apostrophe swap can shift byte offsets, so
            // locate the split point by character count instead.
            let keep = segment.chars().count() - clitic.chars().count();
            let split_at = segment.char_indices().nth(keep).map(|(i, _)| i)?;
            return Some(segment.split_at(split_at));
        }
    }
    None
}

/// Turns raw text into normalized tokens: tokenize → lower-case → lemmatize
pub struct TextNormalizer {
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::with_lemmatizer(Box::new(RuleLemmatizer::default()))
    }
}

impl TextNormalizer {
    pub fn with_lemmatizer(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// Normalize a single raw token
    pub fn normalize(&self, token: &str) -> String {
        self.lemmatizer.lemmatize(&token.to_lowercase())
    }

    /// Tokenize and normalize a whole sentence
    pub fn clean_up(&self, text: &str) -> Vec<String> {
        tokenize(text).iter().map(|t| self.normalize(t)).collect()
    }
}

/// True for punctuation tokens excluded from the vocabulary
pub fn is_ignored(token: &str) -> bool {
    IGNORE_TOKENS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(tokenize("hi!"), vec!["hi", "!"]);
        assert_eq!(
            tokenize("How are you?"),
            vec!["How", "are", "you", "?"]
        );
        assert_eq!(tokenize("   "), Vec::<String>::new());
    }

    #[test]
    fn test_tokenize_splits_clitics() {
        assert_eq!(tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(tokenize("What's up"), vec!["What", "'s", "up"]);
        assert_eq!(tokenize("I\u{2019}m here"), vec!["I", "\u{2019}m", "here"]);
    }

    #[test]
    fn test_lemmatizer_plurals() {
        let lemmatizer = RuleLemmatizer::default();
        assert_eq!(lemmatizer.lemmatize("jokes"), "joke");
        assert_eq!(lemmatizer.lemmatize("stories"), "story");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
        assert_eq!(lemmatizer.lemmatize("churches"), "church");
        assert_eq!(lemmatizer.lemmatize("children"), "child");
    }

    #[test]
    fn test_lemmatizer_leaves_non_plurals() {
        let lemmatizer = RuleLemmatizer::default();
        assert_eq!(lemmatizer.lemmatize("is"), "is");
        assert_eq!(lemmatizer.lemmatize("was"), "was");
        assert_eq!(lemmatizer.lemmatize("class"), "class");
        assert_eq!(lemmatizer.lemmatize("bus"), "bus");
        assert_eq!(lemmatizer.lemmatize("status"), "status");
        assert_eq!(lemmatizer.lemmatize("thanks"), "thanks");
        assert_eq!(lemmatizer.lemmatize("hello"), "hello");
    }

    #[test]
    fn test_clean_up_lowercases_and_lemmatizes() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.clean_up("Tell me JOKES"), vec!["tell", "me", "joke"]);
    }

    #[test]
    fn test_custom_lemmatizer() {
        struct Identity;
        impl Lemmatizer for Identity {
            fn lemmatize(&self, word: &str) -> String {
                word.to_string()
            }
        }
        let normalizer = TextNormalizer::with_lemmatizer(Box::new(Identity));
        assert_eq!(normalizer.clean_up("Jokes"), vec!["jokes"]);
    }

    #[test]
    fn test_ignore_set() {
        for token in IGNORE_TOKENS {
            assert!(is_ignored(token));
        }
        assert!(!is_ignored("'s"));
    }
}
