//! Read-only inference context
//!
//! Built once at start-up from the intents file and the three training
//! artifacts, then shared by reference. Nothing in it changes after
//! construction, so concurrent callers need no locking.

use crate::artifacts::{check_dimensions, load_artifacts, ArtifactPaths};
use crate::encoder::BagOfWords;
use crate::network::Network;
use crate::ranking::{rank, select_response, IntentMatch};
use crate::text::TextNormalizer;
use crate::vocabulary::{LabelSet, Vocabulary};
use crate::{IntentsFile, Result};
use rand::Rng;
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything the inference pipeline needs
pub struct ChatContext {
    intents: IntentsFile,
    encoder: BagOfWords,
    labels: LabelSet,
    network: Network,
}

impl ChatContext {
    /// Assemble a context from in-memory parts, checking dimensions
    pub fn new(
        intents: IntentsFile,
        vocabulary: Vocabulary,
        labels: LabelSet,
        network: Network,
        normalizer: TextNormalizer,
    ) -> Result<Self> {
        check_dimensions(&vocabulary, &labels, &network)?;

        for label in labels.iter() {
            match intents.responses_for(label) {
                None => warn!("Label '{}' has no intent definition; replies will fall back", label),
                Some([]) => warn!("Intent '{}' has no responses; replies will fall back", label),
                Some(_) => {}
            }
        }

        Ok(Self {
            intents,
            encoder: BagOfWords::new(vocabulary, normalizer),
            labels,
            network,
        })
    }

    /// Load the intents file and the artifacts in `artifacts_dir`
    pub fn load(intents_path: &Path, artifacts_dir: &Path) -> Result<Self> {
        let intents = IntentsFile::load(intents_path)?;
        let (vocabulary, labels, network) = load_artifacts(&ArtifactPaths::in_dir(artifacts_dir))?;
        info!(
            "Loaded chat model: {} intents, {} words, {} classes",
            intents.intents.len(),
            vocabulary.len(),
            labels.len()
        );
        Self::new(intents, vocabulary, labels, network, TextNormalizer::default())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.encoder.vocabulary()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn intents(&self) -> &IntentsFile {
        &self.intents
    }

    /// Probability per label, in label order
    pub fn classify(&self, message: &str) -> Result<Vec<f32>> {
        let bag = self.encoder.encode(message);
        self.network.predict(&bag)
    }

    /// Labels above the confidence threshold, best first
    pub fn predict(&self, message: &str) -> Result<Vec<IntentMatch>> {
        let probabilities = self.classify(message)?;
        Ok(rank(&probabilities, &self.labels))
    }

    /// Full pipeline: classify, rank, pick a reply
    pub fn respond<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Result<String> {
        let ranked = self.predict(message)?;
        debug!("Ranked intents for message: {:?}", ranked);
        Ok(select_response(&ranked, &self.intents, rng).to_string())
    }
}
