//! Post persistence
//!
//! One statement per operation; concurrent updates to the same row are
//! last-write-wins. `images` is stored as a JSON array in a text column.

use blog_common::time::{from_storage, now, to_storage};
use blog_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Stored blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
    pub video_link: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
    pub video_link: Option<String>,
}

fn serialize_timestamp<S: Serializer>(value: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&to_storage(value))
}

fn serialize_optional_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(ts) => s.serialize_str(&to_storage(ts)),
        None => s.serialize_none(),
    }
}

fn duplicate_title(title: &str) -> String {
    format!("Post with title '{}' already exists", title)
}

fn encode_images(images: &Option<Vec<String>>) -> Result<Option<String>> {
    images
        .as_ref()
        .map(|list| {
            serde_json::to_string(list)
                .map_err(|e| Error::Internal(format!("Failed to encode images: {}", e)))
        })
        .transpose()
}

fn post_from_row(row: &SqliteRow) -> Result<Post> {
    let images: Option<String> = row.try_get("images")?;
    let images = images
        .map(|raw| {
            serde_json::from_str::<Vec<String>>(&raw)
                .map_err(|e| Error::Internal(format!("Corrupt images column: {}", e)))
        })
        .transpose()?;

    let created_at: String = row.try_get("created_at")?;
    let updated_at: Option<String> = row.try_get("updated_at")?;

    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        images,
        video_link: row.try_get("video_link")?,
        created_at: from_storage(&created_at)?,
        updated_at: updated_at.as_deref().map(from_storage).transpose()?,
    })
}

/// Insert a new post; a duplicate title is a `Conflict`
pub async fn insert_post(pool: &SqlitePool, fields: &PostFields) -> Result<Post> {
    let images = encode_images(&fields.images)?;
    let created_at = now();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, text, images, video_link, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, NULL)
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.text)
    .bind(&images)
    .bind(&fields.video_link)
    .bind(to_storage(&created_at))
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, duplicate_title(&fields.title)))?;

    let id = result.last_insert_rowid();
    get_post(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Post {} vanished after insert", id)))
}

/// Every post, ordered by id
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, text, images, video_link, created_at, updated_at
        FROM posts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(post_from_row).collect()
}

/// Load one post by id
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, text, images, video_link, created_at, updated_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(post_from_row).transpose()
}

/// Replace all caller-supplied fields of a post and refresh `updated_at`
///
/// Returns `None` when no post has this id.
pub async fn update_post(pool: &SqlitePool, id: i64, fields: &PostFields) -> Result<Option<Post>> {
    let images = encode_images(&fields.images)?;

    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, text = ?, images = ?, video_link = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.text)
    .bind(&images)
    .bind(&fields.video_link)
    .bind(to_storage(&now()))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_sqlx(e, duplicate_title(&fields.title)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_post(pool, id).await
}

/// Delete a post; false when it did not exist
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of stored posts
pub async fn count_posts(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
