//! # Blog Common Library
//!
//! Shared code for the blog services:
//! - Common error type
//! - Bootstrap configuration loading (TOML + environment + CLI overrides)
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use config::{BlogConfig, ConfigSource};
pub use error::{Error, Result};
