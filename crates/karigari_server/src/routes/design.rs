//! Design workflow routes.

use crate::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json as ResponseJson;
use axum::{Extension, Json};
use karigari_content::MockupBatch;
use karigari_core::{ProductKind, SourceArtifact};
use karigari_interface::Principal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response payload for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    /// The new artifact's id
    pub id: Uuid,
    /// Publicly resolvable URL of the uploaded image
    pub image_url: String,
}

/// `POST /design/upload` — store a source image for design generation.
pub async fn upload_design(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ResponseJson<ApiResponse<UploadData>>), ApiError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !mime.starts_with("image/") {
            return Err(ApiError::bad_request("Unsupported file type"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;
        upload = Some((filename, mime, bytes.to_vec()));
        break;
    }

    let Some((filename, mime, bytes)) = upload else {
        return Err(ApiError::bad_request("No image file uploaded"));
    };

    let artifact = state
        .designs
        .upload_source(&principal.user_id, &filename, &mime, &bytes)
        .await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(
            "Image uploaded successfully",
            UploadData {
                id: artifact.id,
                image_url: artifact.source_url,
            },
        )),
    ))
}

/// Request body for `POST /design/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDesignsRequest {
    /// The uploaded artifact to generate from
    pub artifact_id: Uuid,
    /// Product tag to render the design onto
    pub product_type: String,
    /// Requested mockup count (clamped server-side)
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    3
}

/// `POST /design/generate` — generate product mockups for an artifact.
pub async fn generate_designs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<GenerateDesignsRequest>,
) -> Result<ResponseJson<ApiResponse<MockupBatch>>, ApiError> {
    let product = ProductKind::parse(&payload.product_type);

    let batch = state
        .designs
        .generate_mockups(
            &principal.user_id,
            payload.artifact_id,
            &product,
            payload.count,
        )
        .await?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        "Designs generated successfully",
        batch,
    )))
}

/// `GET /design` — all of the caller's designs, newest first.
pub async fn list_designs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ResponseJson<ApiResponse<Vec<SourceArtifact>>>, ApiError> {
    let designs = state.designs.list_designs(&principal.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(designs)))
}

/// `GET /design/:id` — one of the caller's designs.
pub async fn get_design(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<SourceArtifact>>, ApiError> {
    let design = state.designs.get_design(&principal.user_id, id).await?;
    Ok(ResponseJson(ApiResponse::success(design)))
}
