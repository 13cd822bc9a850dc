// Uploads above the compression trigger, using the real JPEG compressor

use bytes::Bytes;
use member_documents::store::DocumentStore;
use member_documents::{DocumentError, SizePolicy};

use super::test_harness::{
    blank_jpeg, noisy_low_quality_jpeg, pattern_png, service_with_member, MEMBER_ID,
};

#[tokio::test]
async fn test_png_above_trigger_is_stored_as_jpeg() {
    // 1 MB cap, 1 KB trigger
    let policy = SizePolicy::new(1024 * 1024, 1024, 0.5);
    let (service, _) = service_with_member(policy).await;
    let png = pattern_png(200, 200);
    assert!(png.len() > 1024);

    let receipt = service
        .upload(MEMBER_ID, Bytes::from(png.clone()))
        .await
        .unwrap();
    assert!(receipt.compressed);
    assert_eq!(receipt.original_size, png.len());

    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.content_length(), receipt.stored_size);
    assert_eq!(&document.content[0..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&document.content).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 200));
}

#[tokio::test]
async fn test_compressed_result_still_over_cap_keeps_previous_document() {
    let raw = noisy_low_quality_jpeg(64, 64);
    // Raw fits exactly; re-encoding at 99% quality cannot
    let policy = SizePolicy::new(raw.len() as u64, 0, 0.99);
    let (service, repo) = service_with_member(policy).await;

    let previous = blank_jpeg(10, 10);
    DocumentStore::new(repo.clone())
        .put(MEMBER_ID, "previous.jpg", previous.clone())
        .await
        .unwrap()
        .unwrap();

    let err = service
        .upload(MEMBER_ID, Bytes::from(raw.clone()))
        .await
        .unwrap_err();
    match err {
        DocumentError::PayloadTooLarge { size, max_size } => {
            assert!(size > max_size);
            assert_eq!(max_size, raw.len() as u64);
        }
        other => panic!("Expected PayloadTooLarge, got {:?}", other),
    }

    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.name, "previous.jpg");
    assert_eq!(document.content.as_ref(), previous.as_slice());
    assert_eq!(repo.document_count(), 1);
}

#[tokio::test]
async fn test_non_image_above_trigger_fails_loudly() {
    let policy = SizePolicy::new(1024 * 1024, 16, 0.5);
    let (service, repo) = service_with_member(policy).await;

    let err = service
        .upload(MEMBER_ID, Bytes::from(vec![0x42u8; 4096]))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::Image(_)));
    assert_eq!(repo.document_count(), 0);
}

#[tokio::test]
async fn test_payload_at_trigger_is_not_compressed() {
    let raw = blank_jpeg(10, 10);
    let policy = SizePolicy::new(1024 * 1024, raw.len() as u64, 0.1);
    let (service, _) = service_with_member(policy).await;

    let receipt = service
        .upload(MEMBER_ID, Bytes::from(raw.clone()))
        .await
        .unwrap();
    assert!(!receipt.compressed);
    assert_eq!(receipt.stored_size, raw.len());
}
