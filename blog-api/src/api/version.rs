//! Posts API version negotiation
//!
//! Create reads the request version from `Content-Type` and the response
//! version from `Accept`; both must name one of the vendor media types.
//! Update reads the version from the `v` query parameter: omitted means
//! version 1, and an unrecognized value also falls back to version 1 unless
//! strict checking is enabled in the configuration.

use axum::http::{header, HeaderMap, HeaderName};
use serde::Serialize;
use tracing::debug;

use crate::db::Post;
use crate::{ApiError, ApiResult};

pub const V1_MEDIA_TYPE: &str = "application/vnd.blog.com.v1+json";
pub const V2_MEDIA_TYPE: &str = "application/vnd.blog.com.v2+json";

pub const UNSUPPORTED_VERSION: &str = "Unsupported version";

/// Negotiated posts API version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// `text` optional; responses are the bare post object
    V1,
    /// `text` required; responses wrap the post as `{"post": {...}}`
    V2,
}

/// Response body for a single post in a given version
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PostEnvelope {
    Bare(Post),
    Wrapped { post: Post },
}

impl ApiVersion {
    /// Match a single media type, ignoring parameters and case
    pub fn from_media_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(V1_MEDIA_TYPE) {
            Some(ApiVersion::V1)
        } else if essence.eq_ignore_ascii_case(V2_MEDIA_TYPE) {
            Some(ApiVersion::V2)
        } else {
            None
        }
    }

    /// Version named by the `Content-Type` header
    pub fn from_content_type(headers: &HeaderMap) -> ApiResult<Self> {
        header_value(headers, header::CONTENT_TYPE)
            .and_then(Self::from_media_type)
            .ok_or_else(unsupported)
    }

    /// First vendor media type listed in the `Accept` header
    pub fn from_accept(headers: &HeaderMap) -> ApiResult<Self> {
        header_value(headers, header::ACCEPT)
            .and_then(|value| value.split(',').find_map(Self::from_media_type))
            .ok_or_else(unsupported)
    }

    /// Version from the `v` query parameter
    pub fn from_query(value: Option<&str>, strict: bool) -> ApiResult<Self> {
        match value.map(str::trim) {
            None => Ok(ApiVersion::V1),
            Some("1") => Ok(ApiVersion::V1),
            Some("2") => Ok(ApiVersion::V2),
            Some(_) if strict => Err(unsupported()),
            Some(other) => {
                debug!("Unrecognized update version '{}', using v1", other);
                Ok(ApiVersion::V1)
            }
        }
    }

    /// Whether this version requires a `text` field
    pub fn text_required(self) -> bool {
        self == ApiVersion::V2
    }

    /// Shape a post for a response in this version
    pub fn envelope(self, post: Post) -> PostEnvelope {
        match self {
            ApiVersion::V1 => PostEnvelope::Bare(post),
            ApiVersion::V2 => PostEnvelope::Wrapped { post },
        }
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn unsupported() -> ApiError {
    ApiError::BadRequest(UNSUPPORTED_VERSION.to_string())
}
