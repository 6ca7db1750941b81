//! Intents definition file
//!
//! ```json
//! {"intents": [{"tag": "greeting", "patterns": ["hi"], "responses": ["Hello!"]}]}
//! ```
//!
//! Patterns are only used by training; responses only at inference.

use crate::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named category of user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Parsed intents file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentsFile {
    pub intents: Vec<Intent>,
}

impl IntentsFile {
    /// Load and parse an intents JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChatError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ChatError::json(path, e))
    }

    /// Candidate responses of the first intent carrying `tag`
    pub fn responses_for(&self, tag: &str) -> Option<&[String]> {
        self.intents
            .iter()
            .find(|intent| intent.tag == tag)
            .map(|intent| intent.responses.as_slice())
    }

    /// Iterate over every (pattern, tag) pair in file order
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.intents.iter().flat_map(|intent| {
            intent
                .patterns
                .iter()
                .map(move |pattern| (pattern.as_str(), intent.tag.as_str()))
        })
    }
}
