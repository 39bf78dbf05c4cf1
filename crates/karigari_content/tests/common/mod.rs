// Shared test doubles for the orchestrator tests.
//
// The mock writer routes prompts to scripted responses using the same
// instruction fragments the prompt builder embeds, so the three
// concurrent story calls can be told apart without peeking at call order.

#![allow(dead_code)]

use async_trait::async_trait;
use karigari_content::{DesignLimits, DesignStudio, StoryStudio};
use karigari_core::{
    GenerateRequest, GenerateResponse, ImagePayload, ImageRequest, ImageResponse, Input, Output,
    SourceArtifact, StoryRecord,
};
use karigari_error::{KarigariResult, ModelError, ModelErrorKind, StorageError, StorageErrorKind};
use karigari_interface::{ImageGenerator, TextGenerator};
use karigari_storage::{
    FileSystemStorage, MediaMetadata, MediaReference, MediaStorage, MemoryRecordStore, UploadSpool,
};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted text model. Prompts are routed to responses by the
/// instruction fragments the real prompts carry.
pub struct MockWriter {
    description: String,
    captions: String,
    hashtags: String,
    platform: Mutex<VecDeque<String>>,
    /// Route name that should fail with a 503, if any
    fail_call: Option<&'static str>,
    /// Milliseconds to stall the description call, to scramble completion order
    description_delay_ms: u64,
    pub prompts: Mutex<Vec<String>>,
}

impl MockWriter {
    pub fn scripted(description: &str, captions: &str, hashtags: &str, platform: &str) -> Self {
        Self {
            description: description.to_string(),
            captions: captions.to_string(),
            hashtags: hashtags.to_string(),
            platform: Mutex::new(VecDeque::from([platform.to_string()])),
            fail_call: None,
            description_delay_ms: 0,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_platform_sequence(mut self, responses: &[&str]) -> Self {
        self.platform = Mutex::new(responses.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_call = Some(call);
        self
    }

    pub fn with_slow_description(mut self, delay_ms: u64) -> Self {
        self.description_delay_ms = delay_ms;
        self
    }

    fn route(prompt: &str) -> &'static str {
        if prompt.contains("rich, engaging product description") {
            "description"
        } else if prompt.contains("Include appropriate hashtags at the end") {
            "platform captions"
        } else if prompt.contains("distinct social media captions") {
            "captions"
        } else if prompt.contains("relevant hashtags") {
            "hashtags"
        } else {
            "unknown"
        }
    }

    fn next_platform_response(&self) -> String {
        let mut responses = self.platform.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap_or_default()
        }
    }
}

#[async_trait]
impl TextGenerator for MockWriter {
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

        let route = Self::route(&prompt);
        self.prompts.lock().unwrap().push(prompt);

        if self.fail_call == Some(route) {
            return Err(ModelError::new(ModelErrorKind::HttpError {
                status_code: 503,
                message: format!("scripted failure for {}", route),
            })
            .into());
        }

        let text = match route {
            "description" => {
                if self.description_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(self.description_delay_ms)).await;
                }
                self.description.clone()
            }
            "captions" => self.captions.clone(),
            "hashtags" => self.hashtags.clone(),
            "platform captions" => self.next_platform_response(),
            _ => {
                return Err(ModelError::new(ModelErrorKind::ApiRequest(
                    "mock received an unroutable prompt".to_string(),
                ))
                .into());
            }
        };

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-writer"
    }
}

/// Scripted image model: fails on the listed call indices, otherwise
/// returns a unique payload per call.
pub struct MockImager {
    calls: AtomicU32,
    fail_indices: HashSet<u32>,
}

impl MockImager {
    pub fn new(fail_indices: &[u32]) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_indices: fail_indices.iter().copied().collect(),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockImager {
    async fn generate_image(&self, _req: &ImageRequest) -> KarigariResult<ImageResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_indices.contains(&n) {
            return Err(ModelError::new(ModelErrorKind::HttpError {
                status_code: 503,
                message: format!("scripted failure for call {}", n),
            })
            .into());
        }
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
        "mock-imager"
    }
}

/// Blob store that always fails, for upload cleanup tests.
pub struct FailingMedia;

#[async_trait]
impl MediaStorage for FailingMedia {
    async fn store(
        &self,
        _data: &[u8],
        _metadata: &MediaMetadata,
    ) -> KarigariResult<MediaReference> {
        Err(StorageError::new(StorageErrorKind::FileWrite(
            "scripted blob failure".to_string(),
        ))
        .into())
    }

    async fn retrieve(&self, _reference: &MediaReference) -> KarigariResult<Vec<u8>> {
        Err(StorageError::new(StorageErrorKind::NotFound("failing".to_string())).into())
    }

    async fn delete(&self, _reference: &MediaReference) -> KarigariResult<()> {
        Ok(())
    }

    async fn exists(&self, _reference: &MediaReference) -> KarigariResult<bool> {
        Ok(false)
    }
}

pub struct DesignHarness {
    pub studio: DesignStudio,
    pub records: MemoryRecordStore<SourceArtifact>,
    pub imager: Arc<MockImager>,
    pub uploads_dir: PathBuf,
    _tmp: tempfile::TempDir,
}

pub fn design_harness(fail_indices: &[u32]) -> DesignHarness {
    let tmp = tempfile::tempdir().unwrap();
    let uploads_dir = tmp.path().join("uploads");
    let records = MemoryRecordStore::new();
    let media = Arc::new(
        FileSystemStorage::new(tmp.path().join("media"), "http://localhost:8080/media").unwrap(),
    );
    let imager = Arc::new(MockImager::new(fail_indices));
    let spool = UploadSpool::new(&uploads_dir).unwrap();

    let studio = DesignStudio::new(
        Arc::new(records.clone()),
        media,
        imager.clone(),
        spool,
        DesignLimits {
            max_mockups: 5,
            call_timeout: Duration::from_secs(5),
        },
    );

    DesignHarness {
        studio,
        records,
        imager,
        uploads_dir,
        _tmp: tmp,
    }
}

pub fn design_harness_with_failing_media() -> DesignHarness {
    let tmp = tempfile::tempdir().unwrap();
    let uploads_dir = tmp.path().join("uploads");
    let records = MemoryRecordStore::new();
    let imager = Arc::new(MockImager::new(&[]));
    let spool = UploadSpool::new(&uploads_dir).unwrap();

    let studio = DesignStudio::new(
        Arc::new(records.clone()),
        Arc::new(FailingMedia),
        imager.clone(),
        spool,
        DesignLimits::default(),
    );

    DesignHarness {
        studio,
        records,
        imager,
        uploads_dir,
        _tmp: tmp,
    }
}

pub struct StoryHarness {
    pub studio: StoryStudio,
    pub records: MemoryRecordStore<StoryRecord>,
    pub writer: Arc<MockWriter>,
}

pub fn story_harness(writer: MockWriter) -> StoryHarness {
    let records = MemoryRecordStore::new();
    let writer = Arc::new(writer);
    let studio = StoryStudio::new(
        Arc::new(records.clone()),
        writer.clone(),
        Duration::from_secs(5),
    );
    StoryHarness {
        studio,
        records,
        writer,
    }
}

/// Number of files currently in a directory.
pub fn files_in(dir: &PathBuf) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
