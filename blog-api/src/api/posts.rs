//! Posts resource
//!
//! Bodies are read as raw bytes and parsed here: the `Content-Type` header
//! carries the vendor version rather than `application/json`, so axum's
//! `Json` extractor would reject them.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::version::{ApiVersion, PostEnvelope};
use crate::db::{self, Post, PostFields, MAX_FIELD_CHARS};
use crate::{ApiError, ApiResult, AppState};

/// Incoming post fields before validation
#[derive(Debug, Default, Deserialize)]
pub struct PostPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// A single string is accepted as a one-element list
    #[serde(default, deserialize_with = "one_or_many")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub video_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(image) => vec![image],
        OneOrMany::Many(images) => images,
    }))
}

impl PostPayload {
    /// Parse a request body; an empty body is an empty payload
    pub fn parse(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
    }

    /// Check required fields and lengths for `version`
    pub fn validate(self, version: ApiVersion) -> ApiResult<PostFields> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(ApiError::BadRequest("Post title is required".to_string())),
        };
        if version.text_required() && self.text.is_none() {
            return Err(ApiError::BadRequest("Post text is required".to_string()));
        }
        check_length("title", &title)?;
        if let Some(link) = &self.video_link {
            check_length("video_link", link)?;
        }

        Ok(PostFields {
            title,
            text: self.text,
            images: self.images,
            video_link: self.video_link,
        })
    }
}

fn check_length(field: &str, value: &str) -> ApiResult<()> {
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Post {} must be at most {} characters",
            field, MAX_FIELD_CHARS
        )));
    }
    Ok(())
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Post with ID {} not found", id))
}

/// Query string of `PUT /api/posts/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub v: Option<String>,
}

/// POST /api/posts
///
/// Both version headers are checked before anything is written.
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<PostEnvelope>)> {
    let request_version = ApiVersion::from_content_type(&headers)?;
    let response_version = ApiVersion::from_accept(&headers)?;
    let fields = PostPayload::parse(&body)?.validate(request_version)?;

    let post = db::posts::insert_post(&state.db, &fields).await?;
    info!("Created post {} '{}'", post.id, post.title);

    Ok((StatusCode::CREATED, Json(response_version.envelope(post))))
}

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(db::posts::list_posts(&state.db).await?))
}

/// Integer id from the path; anything else is a JSON 400
fn post_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Rejected post id: {}", rejection);
            Err(ApiError::BadRequest(format!("Invalid post ID: {}", rejection.body_text())))
        }
    }
}

/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Post>> {
    let id = post_id(path)?;
    db::posts::get_post(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/posts/:id?v=1|2
pub async fn update_post(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Query(params): Query<UpdateParams>,
    body: Bytes,
) -> ApiResult<Json<PostEnvelope>> {
    let id = post_id(path)?;
    let version = ApiVersion::from_query(params.v.as_deref(), state.posts.strict_update_version)?;
    let fields = PostPayload::parse(&body)?.validate(version)?;

    let post = db::posts::update_post(&state.db, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("Updated post {}", post.id);

    Ok(Json(version.envelope(post)))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = post_id(path)?;
    if !db::posts::delete_post(&state.db, id).await? {
        return Err(not_found(id));
    }
    info!("Deleted post {}", id);

    Ok(Json(json!({ "message": format!("Post with ID {} deleted successfully", id) })))
}
