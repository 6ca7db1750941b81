//! HTTP API handlers for blog-api

pub mod chat;
pub mod health;
pub mod posts;
pub mod ui;
pub mod version;

pub use chat::chat;
pub use health::health_routes;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use ui::serve_home;
pub use version::ApiVersion;
