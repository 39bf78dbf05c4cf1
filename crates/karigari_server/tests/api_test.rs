// End-to-end router tests: auth middleware, response envelope, and the
// error -> status mapping, driven through tower's oneshot.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use karigari_content::{DesignLimits, DesignStudio, StoryStudio};
use karigari_core::{
    GenerateRequest, GenerateResponse, ImagePayload, ImageRequest, ImageResponse, Input, Output,
};
use karigari_error::KarigariResult;
use karigari_interface::{ImageGenerator, TextGenerator};
use karigari_server::AppState;
use karigari_server::identity::StaticTokenVerifier;
use karigari_server::routes;
use karigari_storage::{FileSystemStorage, MemoryRecordStore, UploadSpool};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tower::ServiceExt;

/// Fixed-output text model routed by prompt content, like the real
/// prompts are.
struct ScriptedWriter;

#[async_trait]
impl TextGenerator for ScriptedWriter {
    async fn generate(&self, req: &GenerateRequest) -> KarigariResult<GenerateResponse> {
        let prompt = req
            .messages
            .iter()
            .flat_map(|m| &m.content)
            .filter_map(|i| match i {
                Input::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        let text = if prompt.contains("rich, engaging product description") {
            "A heritage weave, four generations deep.".to_string()
        } else if prompt.contains("Include appropriate hashtags at the end") {
            "Caption 1: Fresh off the loom #Handloom".to_string()
        } else if prompt.contains("distinct social media captions") {
            "Caption 1: A\nCaption 2: B\nCaption 3: C".to_string()
        } else {
            "#Handmade #IndianCraft #EthicalFashion".to_string()
        };

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

struct CountingImager {
    calls: AtomicU32,
}

#[async_trait]
impl ImageGenerator for CountingImager {
    async fn generate_image(&self, _req: &ImageRequest) -> KarigariResult<ImageResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImageResponse {
            images: vec![ImagePayload {
                mime: Some("image/png".to_string()),
                data: format!("png-{}", n).into_bytes(),
            }],
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

fn test_app() -> (Router, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();

    let media = Arc::new(
        FileSystemStorage::new(tmp.path().join("media"), "http://localhost:8080/media").unwrap(),
    );
    let spool = UploadSpool::new(tmp.path().join("uploads")).unwrap();

    let designs = Arc::new(DesignStudio::new(
        Arc::new(MemoryRecordStore::new()),
        media,
        Arc::new(CountingImager {
            calls: AtomicU32::new(0),
        }),
        spool,
        DesignLimits {
            max_mockups: 5,
            call_timeout: Duration::from_secs(5),
        },
    ));
    let stories = Arc::new(StoryStudio::new(
        Arc::new(MemoryRecordStore::new()),
        Arc::new(ScriptedWriter),
        Duration::from_secs(5),
    ));
    let verifier = Arc::new(StaticTokenVerifier::new(HashMap::from([
        ("token-1".to_string(), "user-1".to_string()),
        ("token-2".to_string(), "user-2".to_string()),
    ])));

    let state = AppState::new(designs, stories, verifier);
    let media_root = tmp.path().join("media");
    (routes::router(state, &media_root), tmp)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_upload(token: &str) -> Request<Body> {
    let boundary = "X-KARIGARI-BOUNDARY";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"saree.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNGDATA\r\n\
         --{b}--\r\n",
        b = boundary
    );
    Request::builder()
        .method("POST")
        .uri("/design/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _tmp) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn missing_and_invalid_tokens_are_401() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/design").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");

    let response = app
        .oneshot(get_request("/design", "not-a-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn design_flow_uploads_generates_and_reads_back() {
    let (app, _tmp) = test_app();

    // Upload
    let response = app.clone().oneshot(multipart_upload("token-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    let artifact_id = json["data"]["id"].as_str().unwrap().to_string();
    assert!(
        json["data"]["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:8080/media/images/")
    );

    // Generate with an over-limit count
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/design/generate",
            "token-1",
            serde_json::json!({
                "artifactId": artifact_id,
                "productType": "bag",
                "count": 7,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["generated"].as_array().unwrap().len(), 5);

    // Read back
    let response = app
        .oneshot(get_request(&format!("/design/{}", artifact_id), "token-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(
        json["data"]["generatedImages"].as_array().unwrap().len(),
        5
    );
}

#[tokio::test]
async fn foreign_design_is_403_and_missing_design_is_404() {
    let (app, _tmp) = test_app();

    let response = app.clone().oneshot(multipart_upload("token-1")).await.unwrap();
    let json = body_json(response).await;
    let artifact_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/design/{}", artifact_id), "token-2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_request(
            &format!("/design/{}", uuid::Uuid::new_v4()),
            "token-1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn story_flow_generates_and_adds_platform_captions() {
    let (app, _tmp) = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/story/generate",
            "token-1",
            serde_json::json!({
                "text": "Handwoven cotton saree with natural dyes",
                "productName": "Cotton Saree",
                "craftType": "textile",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let story_id = json["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["captions"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(
        json["data"]["hashtags"],
        serde_json::json!(["#Handmade", "#IndianCraft", "#EthicalFashion"])
    );

    // Platform captions, mixed-case platform name
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/story/captions",
            "token-1",
            serde_json::json!({ "storyId": story_id, "platform": "Instagram" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["platform"], "instagram");
    assert_eq!(
        json["data"]["captions"][0]["hashtags"],
        serde_json::json!(["#Handloom"])
    );

    // Listing shows the single story with the merged captions
    let response = app.oneshot(get_request("/story", "token-1")).await.unwrap();
    let json = body_json(response).await;
    let stories = json["data"].as_array().unwrap();
    assert_eq!(stories.len(), 1);
    assert!(stories[0]["platformCaptions"]["instagram"].is_array());
}

#[tokio::test]
async fn empty_story_text_is_400() {
    let (app, _tmp) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/story/generate",
            "token-1",
            serde_json::json!({ "text": "  " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Text input is required");
}
