//! blog-api library - posts CRUD and chatbot over HTTP
//!
//! The router is built from an [`AppState`] holding the database pool and
//! the read-only chat context, so tests can drive it in-process with
//! alternate fixtures.

use axum::Router;
use blog_chat::ChatContext;
use blog_common::config::PostsConfig;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Posts database pool
    pub db: SqlitePool,
    /// Intents, vocabulary, labels and network, loaded once at start-up
    pub chat: Arc<ChatContext>,
    /// Posts API switches
    pub posts: PostsConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, chat: ChatContext, posts: PostsConfig) -> Self {
        Self {
            db,
            chat: Arc::new(chat),
            posts,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let posts = Router::new()
        .route("/api/posts", post(api::create_post).get(api::list_posts))
        .route(
            "/api/posts/:id",
            get(api::get_post).put(api::update_post).delete(api::delete_post),
        );

    Router::new()
        .route("/", get(api::serve_home))
        .route("/chat", post(api::chat))
        .merge(posts)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
