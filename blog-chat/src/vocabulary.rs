//! Vocabulary and label set
//!
//! Both are sorted, de-duplicated string sequences whose positions define
//! vector indices: the vocabulary fixes the feature dimension, the label set
//! fixes the classifier's output dimension. Sorting makes the assignment
//! identical between training and inference.

use crate::text::{is_ignored, tokenize, TextNormalizer};
use crate::IntentsFile;
use std::collections::{BTreeSet, HashMap};

/// Sorted unique strings with O(1) position lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedIndex {
    entries: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SortedIndex {
    /// Build from any strings; sorts and removes duplicates
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = items.into_iter().map(Into::into).collect();
        let entries: Vec<String> = unique.into_iter().collect();
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.clone(), i))
            .collect();
        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.positions.get(entry).copied()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.positions.contains_key(entry)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Normalized words known to the classifier
pub type Vocabulary = SortedIndex;

/// Intent tags known to the classifier
pub type LabelSet = SortedIndex;

/// A tokenized training pattern and its tag
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub tokens: Vec<String>,
    pub tag: String,
}

/// Output of the vocabulary builder
#[derive(Debug, Clone)]
pub struct Corpus {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    pub documents: Vec<Document>,
}

/// Derive vocabulary, label set and tokenized documents from intents
///
/// Only intents that contribute at least one pattern produce a label.
pub fn build_corpus(intents: &IntentsFile, normalizer: &TextNormalizer) -> Corpus {
    let mut words = Vec::new();
    let mut tags = Vec::new();
    let mut documents = Vec::new();

    for (pattern, tag) in intents.documents() {
        let tokens = tokenize(pattern);
        words.extend(
            tokens
                .iter()
                .filter(|token| !is_ignored(token))
                .map(|token| normalizer.normalize(token)),
        );
        documents.push(Document {
            tokens,
            tag: tag.to_string(),
        });
        tags.push(tag.to_string());
    }

    Corpus {
        vocabulary: Vocabulary::new(words),
        labels: LabelSet::new(tags),
        documents,
    }
}
