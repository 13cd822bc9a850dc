// Shared fixtures: generated images and pre-wired services

use image::{DynamicImage, ImageFormat, RgbImage};
use member_documents::store::{InMemoryRepository, Member, MemberRepository};
use member_documents::{MemberDocumentService, SizePolicy};
use std::io::Cursor;
use std::sync::Arc;

pub const MEMBER_ID: &str = "default-member-id-for-testing";

/// Black JPEG, like a blank scan
pub fn blank_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(RgbImage::new(width, height)), ImageFormat::Jpeg)
}

/// Gradient with a multiplicative term so neither PNG nor JPEG finds it trivial
pub fn pattern_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 255) as u8, (y % 255) as u8, ((x * y) % 255) as u8])
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Deterministic pixel noise encoded as a low-quality JPEG
pub fn noisy_low_quality_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        image::Rgb([next(), next(), next()])
    });

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 10);
        encoder.encode_image(&img).unwrap();
    }
    buffer.into_inner()
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// In-memory service with `MEMBER_ID` already registered
pub async fn service_with_member(
    policy: SizePolicy,
) -> (Arc<MemberDocumentService>, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    repo.save_member(Member::new(MEMBER_ID, "test-member-name"))
        .await
        .unwrap();
    let service = Arc::new(MemberDocumentService::new(repo.clone(), policy));
    (service, repo)
}

/// Cap of 1 KB with compression effectively disabled
pub fn tiny_cap_policy() -> SizePolicy {
    let files = member_documents::config::FilesConfig {
        max_size_kbytes: 1,
        compression_border_size_kbytes: 99_000,
        compressed_image_quality: 0.99,
    };
    SizePolicy::from_config(&files)
}
