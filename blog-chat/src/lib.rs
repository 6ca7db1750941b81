//! # Blog Chat
//!
//! Bag-of-words intent classifier behind the blog's chat endpoint.
//!
//! Inference pipeline, run once per message:
//! tokenize → lower-case + lemmatize → bag-of-words against the trained
//! vocabulary → feed-forward network → threshold/rank → random canned reply.
//!
//! Training ([`training`]) derives the vocabulary and label set from an
//! intents file, fits the network and writes three artifacts
//! ([`artifacts`]) that [`ChatContext::load`] reads back at start-up.

pub mod artifacts;
pub mod context;
pub mod encoder;
pub mod error;
pub mod intents;
pub mod network;
pub mod ranking;
pub mod text;
pub mod training;
pub mod vocabulary;

pub use context::ChatContext;
pub use error::{ChatError, Result};
pub use intents::{Intent, IntentsFile};
pub use ranking::IntentMatch;
