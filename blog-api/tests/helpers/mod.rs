//! Test Helper Utilities
//!
//! Shared fixtures for the blog-api integration tests: an in-memory posts
//! database, a tiny trained chat model and request builders.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use blog_api::{build_router, db, AppState};
use blog_chat::text::TextNormalizer;
use blog_chat::training::{train, TrainingConfig};
use blog_chat::{ChatContext, Intent, IntentsFile};
use blog_common::config::PostsConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const V1: &str = "application/vnd.blog.com.v1+json";
pub const V2: &str = "application/vnd.blog.com.v2+json";

/// In-memory posts database; one connection so every query sees the schema
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    db::init_tables(&pool).await.expect("Failed to create schema");
    pool
}

/// Single-intent chat model: every message classifies as "greeting"
pub fn greeting_context() -> ChatContext {
    let intents = IntentsFile {
        intents: vec![Intent {
            tag: "greeting".to_string(),
            patterns: vec!["hi".to_string(), "hello".to_string()],
            responses: vec!["Hello!".to_string()],
        }],
    };
    let normalizer = TextNormalizer::default();
    let mut rng = StdRng::seed_from_u64(11);
    let trained = train(&intents, &normalizer, &TrainingConfig::default(), &mut rng)
        .expect("training should succeed");

    ChatContext::new(
        intents,
        trained.vocabulary,
        trained.labels,
        trained.network,
        normalizer,
    )
    .expect("context should assemble")
}

/// Router over a fresh database, plus a handle to that database
pub async fn setup_app(posts: PostsConfig) -> (Router, SqlitePool) {
    let pool = create_test_pool().await;
    let state = AppState::new(pool.clone(), greeting_context(), posts);
    (build_router(state), pool)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// POST /api/posts with explicit version headers (None omits the header)
pub fn create_request(content_type: Option<&str>, accept: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/posts");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn post_count(pool: &SqlitePool) -> i64 {
    db::posts::count_posts(pool).await.expect("count should succeed")
}
