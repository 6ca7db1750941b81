//! Bag-of-words feature encoder
//!
//! Maps text to a 0/1 vector with one slot per vocabulary word. Words outside
//! the vocabulary are dropped silently; term frequency is ignored.

use crate::text::TextNormalizer;
use crate::vocabulary::Vocabulary;

/// Encodes text against a fixed vocabulary
pub struct BagOfWords {
    vocabulary: Vocabulary,
    normalizer: TextNormalizer,
}

impl BagOfWords {
    pub fn new(vocabulary: Vocabulary, normalizer: TextNormalizer) -> Self {
        Self {
            vocabulary,
            normalizer,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Vector length, equal to the vocabulary size
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Encode raw text
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let words = self.normalizer.clean_up(text);
        encode_words(&self.vocabulary, &words)
    }
}

/// Encode already-normalized words
pub fn encode_words<S: AsRef<str>>(vocabulary: &Vocabulary, words: &[S]) -> Vec<f32> {
    let mut bag = vec![0.0; vocabulary.len()];
    for word in words {
        if let Some(index) = vocabulary.position(word.as_ref()) {
            bag[index] = 1.0;
        }
    }
    bag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> BagOfWords {
        BagOfWords::new(
            Vocabulary::new(["hello", "hi", "joke", "tell"]),
            TextNormalizer::default(),
        )
    }

    #[test]
    fn test_length_and_binary_values() {
        let bag = encoder().encode("hello hello HELLO tell me a joke about zebras");
        assert_eq!(bag.len(), 4);
        assert_eq!(bag, vec![1.0, 0.0, 1.0, 1.0]);
        assert!(bag.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_case_and_punctuation_invariance() {
        let encoder = encoder();
        let plain = encoder.encode("tell me jokes");
        assert_eq!(encoder.encode("Tell me JOKES!?"), plain);
        assert_eq!(encoder.encode("tell, me; jokes."), plain);
    }

    #[test]
    fn test_deterministic() {
        let encoder = encoder();
        let first = encoder.encode("Hi, tell me a joke");
        for _ in 0..10 {
            assert_eq!(encoder.encode("Hi, tell me a joke"), first);
        }
    }

    #[test]
    fn test_out_of_vocabulary_is_all_zero() {
        let bag = encoder().encode("quantum chromodynamics");
        assert_eq!(bag, vec![0.0; 4]);
        assert_eq!(encoder().encode(""), vec![0.0; 4]);
    }
}
