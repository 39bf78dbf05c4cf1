// Orchestrator tests for the design workflow, using scripted models and
// in-memory records.

mod common;

use common::{design_harness, design_harness_with_failing_media, files_in};
use karigari_core::{ArtifactStatus, ProductKind};
use karigari_error::KarigariErrorKind;

#[tokio::test]
async fn empty_upload_is_a_validation_error() {
    let harness = design_harness(&[]);

    let result = harness
        .studio
        .upload_source("user-1", "empty.png", "image/png", &[])
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::Validation(_))),
        Ok(_) => panic!("empty upload must be rejected"),
    }
}

#[tokio::test]
async fn upload_creates_artifact_and_clears_spool() -> anyhow::Result<()> {
    let harness = design_harness(&[]);

    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    assert_eq!(artifact.owner_id, "user-1");
    assert_eq!(artifact.status, ArtifactStatus::Uploaded);
    assert!(artifact.generated_images.is_empty());
    assert!(artifact.source_url.starts_with("http://localhost:8080/media/images/"));

    // Persisted and readable back
    let loaded = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(loaded.id, artifact.id);

    // The spooled temp file is gone
    assert_eq!(files_in(&harness.uploads_dir), 0);
    Ok(())
}

#[tokio::test]
async fn failed_blob_write_still_clears_spool() {
    let harness = design_harness_with_failing_media();

    let result = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::Storage(_))),
        Ok(_) => panic!("blob failure must surface"),
    }
    assert_eq!(files_in(&harness.uploads_dir), 0);
}

#[tokio::test]
async fn mockup_count_is_capped_at_five() -> anyhow::Result<()> {
    let harness = design_harness(&[]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    let batch = harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::parse("bag"), 7)
        .await?;

    assert_eq!(batch.generated.len(), 5);
    assert!(batch.failures.is_empty());
    assert!(batch.generated.iter().all(|i| i.product_kind.tag() == "bag"));
    assert_eq!(harness.imager.call_count(), 5);

    let updated = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(updated.status, ArtifactStatus::Completed);
    assert_eq!(updated.generated_images.len(), 5);
    Ok(())
}

#[tokio::test]
async fn foreign_artifact_is_forbidden_and_unchanged() -> anyhow::Result<()> {
    let harness = design_harness(&[]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    let result = harness
        .studio
        .generate_mockups("user-2", artifact.id, &ProductKind::Bag, 3)
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::Access(_))),
        Ok(_) => panic!("foreign access must be forbidden"),
    }

    // No mutation: status and images untouched, no model calls made
    let unchanged = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(unchanged.status, ArtifactStatus::Uploaded);
    assert!(unchanged.generated_images.is_empty());
    assert_eq!(harness.imager.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_artifact_is_not_found() {
    let harness = design_harness(&[]);

    let result = harness
        .studio
        .generate_mockups("user-1", uuid::Uuid::new_v4(), &ProductKind::Bag, 3)
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::NotFound(_))),
        Ok(_) => panic!("missing artifact must be not-found"),
    }
}

#[tokio::test]
async fn partial_failure_keeps_the_successes() -> anyhow::Result<()> {
    // Second of three calls fails
    let harness = design_harness(&[1]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    let batch = harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::Cushion, 3)
        .await?;

    assert_eq!(batch.generated.len(), 2);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].index, 1);

    let updated = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(updated.status, ArtifactStatus::Completed);
    assert_eq!(updated.generated_images.len(), 2);
    Ok(())
}

#[tokio::test]
async fn total_failure_marks_the_artifact_failed() -> anyhow::Result<()> {
    let harness = design_harness(&[0, 1]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    let result = harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::Bag, 2)
        .await;
    assert!(result.is_err());

    let updated = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(updated.status, ArtifactStatus::Failed);
    assert!(updated.generated_images.is_empty());
    Ok(())
}

#[tokio::test]
async fn generation_is_permitted_exactly_once() -> anyhow::Result<()> {
    let harness = design_harness(&[]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::Bag, 1)
        .await?;

    let result = harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::Bag, 1)
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::Validation(_))),
        Ok(_) => panic!("regeneration must be rejected"),
    }

    // The rejected call made no model calls and left the record alone
    let unchanged = harness.studio.get_design("user-1", artifact.id).await?;
    assert_eq!(unchanged.status, ArtifactStatus::Completed);
    assert_eq!(unchanged.generated_images.len(), 1);
    assert_eq!(harness.imager.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn listing_is_owner_scoped_and_newest_first() -> anyhow::Result<()> {
    let harness = design_harness(&[]);

    let older = harness
        .studio
        .upload_source("user-1", "a.png", "image/png", b"bytes a")
        .await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = harness
        .studio
        .upload_source("user-1", "b.png", "image/png", b"bytes b")
        .await?;
    harness
        .studio
        .upload_source("user-2", "c.png", "image/png", b"bytes c")
        .await?;

    let designs = harness.studio.list_designs("user-1").await?;
    let ids: Vec<_> = designs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    Ok(())
}

#[tokio::test]
async fn zero_count_is_a_validation_error() -> anyhow::Result<()> {
    let harness = design_harness(&[]);
    let artifact = harness
        .studio
        .upload_source("user-1", "saree.png", "image/png", b"png bytes")
        .await?;

    let result = harness
        .studio
        .generate_mockups("user-1", artifact.id, &ProductKind::Bag, 0)
        .await;

    match result {
        Err(e) => assert!(matches!(e.kind(), KarigariErrorKind::Validation(_))),
        Ok(_) => panic!("zero count must be rejected"),
    }
    Ok(())
}
