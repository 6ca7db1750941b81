//! Chat endpoint
//!
//! `POST /chat` with `{"message": "..."}` answers `{"response": "..."}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

/// Returned for a malformed body or a missing/blank message
pub const NO_MESSAGE: &str = "No message provided";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let message = match payload {
        Ok(Json(ChatRequest { message: Some(m) })) if !m.trim().is_empty() => m,
        Ok(_) => return Err(ApiError::BadRequest(NO_MESSAGE.to_string())),
        Err(rejection) => {
            debug!("Rejected chat body: {}", rejection);
            return Err(ApiError::BadRequest(NO_MESSAGE.to_string()));
        }
    };

    // thread_rng is not Send; keep it out of scope of any await
    let response = state.chat.respond(&message, &mut rand::thread_rng())?;
    Ok(Json(ChatResponse { response }))
}
