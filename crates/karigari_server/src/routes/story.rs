//! Story workflow routes.

use crate::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json as ResponseJson;
use axum::{Extension, Json};
use karigari_core::{Platform, PlatformCaption, StoryRecord};
use karigari_interface::Principal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for `POST /story/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    /// The artisan's free-form input text
    pub text: String,
    /// Product name (optional)
    #[serde(default)]
    pub product_name: String,
    /// Craft type (optional)
    #[serde(default)]
    pub craft_type: String,
}

/// `POST /story/generate` — generate a full story record.
pub async fn generate_story(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<GenerateStoryRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<StoryRecord>>), ApiError> {
    let story = state
        .stories
        .generate_story(
            &principal.user_id,
            &payload.text,
            &payload.product_name,
            &payload.craft_type,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(
            "Story generated successfully",
            story,
        )),
    ))
}

/// Request body for `POST /story/captions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCaptionsRequest {
    /// The story to extend
    pub story_id: Uuid,
    /// Target platform name (case-insensitive)
    pub platform: String,
}

/// Response payload for `POST /story/captions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCaptionsData {
    /// The story's id
    pub id: Uuid,
    /// Canonical platform tag the captions were stored under
    pub platform: String,
    /// The new caption set
    pub captions: Vec<PlatformCaption>,
}

/// `POST /story/captions` — generate and merge platform captions.
pub async fn platform_captions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<PlatformCaptionsRequest>,
) -> Result<ResponseJson<ApiResponse<PlatformCaptionsData>>, ApiError> {
    let platform = Platform::parse(&payload.platform);

    let captions = state
        .stories
        .add_platform_captions(&principal.user_id, payload.story_id, &platform)
        .await?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        format!("Captions for {} generated successfully", platform.key()),
        PlatformCaptionsData {
            id: payload.story_id,
            platform: platform.key().to_string(),
            captions,
        },
    )))
}

/// `GET /story` — all of the caller's stories, newest first.
pub async fn list_stories(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ResponseJson<ApiResponse<Vec<StoryRecord>>>, ApiError> {
    let stories = state.stories.list_stories(&principal.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(stories)))
}

/// `GET /story/:id` — one of the caller's stories.
pub async fn get_story(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<StoryRecord>>, ApiError> {
    let story = state.stories.get_story(&principal.user_id, id).await?;
    Ok(ResponseJson(ApiResponse::success(story)))
}
