//! Ranking of classifier output and canned-response selection
//!
//! Response choice is uniformly random and deliberately not seeded in
//! production, so the same message can get different replies across calls.
//! Callers pass the generator in; tests use a seeded one.

use crate::vocabulary::LabelSet;
use crate::IntentsFile;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;

/// Minimum probability (exclusive) for a label to count as a match
pub const ERROR_THRESHOLD: f32 = 0.25;

/// Reply when no label clears the threshold
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that.";

/// Reply when the top label has no configured responses
pub const NO_RESPONSE: &str = "Sorry, I didn't find a response.";

/// One ranked candidate label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentMatch {
    pub intent: String,
    pub probability: f32,
}

/// Pair labels with probabilities, keep those above [`ERROR_THRESHOLD`],
/// sort descending. Ties keep label order (stable sort).
pub fn rank(probabilities: &[f32], labels: &LabelSet) -> Vec<IntentMatch> {
    let mut matches: Vec<IntentMatch> = probabilities
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p > ERROR_THRESHOLD)
        .filter_map(|(i, &p)| {
            labels.get(i).map(|label| IntentMatch {
                intent: label.to_string(),
                probability: p,
            })
        })
        .collect();
    matches.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

/// Pick a reply for the top-ranked intent
pub fn select_response<'a, R: Rng + ?Sized>(
    ranked: &[IntentMatch],
    intents: &'a IntentsFile,
    rng: &mut R,
) -> &'a str {
    let Some(top) = ranked.first() else {
        return NOT_UNDERSTOOD;
    };
    intents
        .responses_for(&top.intent)
        .and_then(|responses| responses.choose(rng))
        .map(String::as_str)
        .unwrap_or(NO_RESPONSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Intent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels() -> LabelSet {
        LabelSet::new(["goodbye", "greeting", "jokes"])
    }

    fn intents() -> IntentsFile {
        IntentsFile {
            intents: vec![
                Intent {
                    tag: "greeting".to_string(),
                    patterns: vec![],
                    responses: vec!["Hello!".into(), "Hi there".into(), "Hey".into()],
                },
                Intent {
                    tag: "goodbye".to_string(),
                    patterns: vec![],
                    responses: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let ranked = rank(&[0.3, 0.05, 0.65], &labels());
        assert_eq!(
            ranked,
            vec![
                IntentMatch { intent: "jokes".into(), probability: 0.65 },
                IntentMatch { intent: "goodbye".into(), probability: 0.3 },
            ]
        );
    }

    #[test]
    fn test_rank_threshold_is_exclusive() {
        assert!(rank(&[0.25, 0.25, 0.5], &labels())
            .iter()
            .all(|m| m.probability > ERROR_THRESHOLD));
        assert!(rank(&[0.25, 0.25, 0.25], &labels()).is_empty());
    }

    #[test]
    fn test_rank_ties_keep_label_order() {
        let ranked = rank(&[0.4, 0.4, 0.2], &labels());
        assert_eq!(ranked[0].intent, "goodbye");
        assert_eq!(ranked[1].intent, "greeting");
    }

    #[test]
    fn test_rank_ignores_nan() {
        assert_eq!(rank(&[f32::NAN, 0.9, 0.1], &labels()).len(), 1);
    }

    #[test]
    fn test_select_empty_ranking_is_not_understood() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_response(&[], &intents(), &mut rng), NOT_UNDERSTOOD);
    }

    #[test]
    fn test_select_returns_member_of_configured_set() {
        let intents = intents();
        let allowed = intents.responses_for("greeting").unwrap();
        let ranked = vec![IntentMatch { intent: "greeting".into(), probability: 0.9 }];
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let reply = select_response(&ranked, &intents, &mut rng);
            assert!(allowed.iter().any(|r| r == reply), "unexpected reply {}", reply);
            seen.insert(reply);
        }
        // Uniform choice over three replies reaches all of them
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_select_missing_or_empty_responses() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = vec![IntentMatch { intent: "goodbye".into(), probability: 0.9 }];
        assert_eq!(select_response(&empty, &intents(), &mut rng), NO_RESPONSE);
        let missing = vec![IntentMatch { intent: "jokes".into(), probability: 0.9 }];
        assert_eq!(select_response(&missing, &intents(), &mut rng), NO_RESPONSE);
    }
}
