// Upload / fetch / replace / delete against the in-memory repository

use bytes::Bytes;
use member_documents::store::{DocumentStore, MemberRepository};
use member_documents::{document_name_for, DocumentError, SizePolicy};
use std::sync::Arc;

use super::test_harness::{blank_jpeg, service_with_member, tiny_cap_policy, MEMBER_ID};

const DEFAULT_DOCUMENT_NAME: &str = "test-document";

async fn add_default_document(repo: Arc<member_documents::store::InMemoryRepository>) {
    DocumentStore::new(repo)
        .put(MEMBER_ID, DEFAULT_DOCUMENT_NAME, blank_jpeg(10, 10))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_small_image_round_trips_byte_identical() {
    let (service, _) = service_with_member(tiny_cap_policy()).await;
    let image = blank_jpeg(10, 10);
    assert!(image.len() <= 1024, "fixture must fit the 1 KB cap");

    let receipt = service
        .upload(MEMBER_ID, Bytes::from(image.clone()))
        .await
        .unwrap();
    assert!(!receipt.compressed);

    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.content.as_ref(), image.as_slice());
    assert_eq!(document.content_type(), "image/jpeg");
    assert_eq!(document.name, format!("member_{}_document.jpg", MEMBER_ID));
}

#[tokio::test]
async fn test_large_image_rejected_and_existing_document_kept() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;
    add_default_document(repo.clone()).await;

    let err = service
        .upload(MEMBER_ID, Bytes::from(blank_jpeg(1000, 1000)))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::PayloadTooLarge { max_size: 1024, .. }));

    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.name, DEFAULT_DOCUMENT_NAME);
    assert_ne!(document.name, document_name_for(MEMBER_ID));
}

#[tokio::test]
async fn test_large_image_rejected_without_existing_document() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;

    let result = service
        .upload(MEMBER_ID, Bytes::from(blank_jpeg(1000, 1000)))
        .await;
    assert!(result.is_err());

    let member = repo.find_member_by_id(MEMBER_ID).await.unwrap().unwrap();
    assert!(member.document_id.is_none());
    assert_eq!(repo.document_count(), 0);
}

#[tokio::test]
async fn test_upload_for_unknown_member_leaves_others_untouched() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;

    let err = service
        .upload("non-exist-member-id", Bytes::from(blank_jpeg(10, 10)))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::MemberNotFound { .. }));

    let member = repo.find_member_by_id(MEMBER_ID).await.unwrap().unwrap();
    assert!(member.document_id.is_none());
}

#[tokio::test]
async fn test_replace_keeps_exactly_one_document() {
    let policy = SizePolicy::new(1024 * 1024, 1024 * 1024, 0.8);
    let (service, repo) = service_with_member(policy).await;
    let first = blank_jpeg(10, 10);
    let second = blank_jpeg(20, 20);

    service.upload(MEMBER_ID, Bytes::from(first)).await.unwrap();
    service
        .upload(MEMBER_ID, Bytes::from(second.clone()))
        .await
        .unwrap();

    assert_eq!(repo.document_count(), 1);
    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.content.as_ref(), second.as_slice());
}

#[tokio::test]
async fn test_replace_existing_default_document_renames_it() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;
    add_default_document(repo.clone()).await;

    service
        .upload(MEMBER_ID, Bytes::from(blank_jpeg(10, 10)))
        .await
        .unwrap();

    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert_eq!(document.name, document_name_for(MEMBER_ID));
    assert_eq!(repo.document_count(), 1);
}

#[tokio::test]
async fn test_fetch_without_document_is_not_an_empty_payload() {
    let (service, _) = service_with_member(tiny_cap_policy()).await;

    let err = service.fetch(MEMBER_ID).await.unwrap_err();
    assert!(matches!(err, DocumentError::DocumentNotFound { .. }));
}

#[tokio::test]
async fn test_fetch_for_unknown_member() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;
    add_default_document(repo).await;

    let err = service.fetch("non-existing-member-id").await.unwrap_err();
    assert!(matches!(err, DocumentError::MemberNotFound { .. }));
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;
    add_default_document(repo.clone()).await;

    service.remove(MEMBER_ID).await.unwrap();
    let member = repo.find_member_by_id(MEMBER_ID).await.unwrap().unwrap();
    assert!(member.document_id.is_none());

    let err = service.remove(MEMBER_ID).await.unwrap_err();
    assert!(matches!(err, DocumentError::DocumentNotFound { .. }));
}

#[tokio::test]
async fn test_delete_for_unknown_member() {
    let (service, repo) = service_with_member(tiny_cap_policy()).await;
    add_default_document(repo.clone()).await;

    let err = service.remove("non-existing-member-id").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.document_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_leave_one_attached_document() {
    let policy = SizePolicy::new(1024 * 1024, 1024 * 1024, 0.8);
    let (service, repo) = service_with_member(policy).await;
    let uploads: Vec<Bytes> = (1..=8u32)
        .map(|i| Bytes::from(blank_jpeg(i * 4, i * 4)))
        .collect();

    let mut handles = Vec::new();
    for raw in uploads.iter().cloned() {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.upload(MEMBER_ID, raw).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(repo.document_count(), 1);
    let document = service.fetch(MEMBER_ID).await.unwrap();
    assert!(uploads.contains(&document.content));
}
