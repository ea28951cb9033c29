#[allow(dead_code)]
mod common;

use std::time::{Duration, Instant};

use tempfile::TempDir;

use hemascope_core::error::HemascopeError;
use hemascope_core::image_handle::{decode_bytes, decode_image, ImageHandle, ImageLoader};

#[test]
fn test_loader_starts_empty() {
    let loader = ImageLoader::new();
    assert!(matches!(loader.handle(), ImageHandle::Empty));
    assert!(loader.latest_token().is_none());
}

#[test]
fn test_loader_accepts_latest_completion() {
    let mut loader = ImageLoader::new();
    let token = loader.request("slide.png");
    assert!(loader.handle().is_loading());
    assert!(loader.complete(token, Ok(common::solid_image(8, 4, [1, 2, 3, 255]))));
    let slide = loader.handle().ready().unwrap();
    assert_eq!(slide.size().width, 8);
    assert_eq!(slide.size().height, 4);
    assert_eq!(slide.id(), token.value());
}

#[test]
fn test_loader_discards_stale_completion() {
    let mut loader = ImageLoader::new();
    let first = loader.request("a.png");
    let second = loader.request("b.png");
    assert!(second.value() > first.value());

    // The slow first request finishes after the second was issued.
    assert!(!loader.complete(first, Ok(common::solid_image(4, 4, [0, 0, 0, 255]))));
    assert!(loader.handle().is_loading());

    assert!(loader.complete(second, Ok(common::solid_image(2, 2, [0, 0, 0, 255]))));
    assert_eq!(loader.handle().ready().unwrap().size().width, 2);

    // Late duplicate after completion is ignored too.
    assert!(!loader.complete(second, Ok(common::solid_image(9, 9, [0, 0, 0, 255]))));
    assert_eq!(loader.handle().ready().unwrap().size().width, 2);
}

#[test]
fn test_loader_failure_becomes_failed_handle() {
    let mut loader = ImageLoader::new();
    let token = loader.request("missing.png");
    let err = HemascopeError::ImageLoad {
        source_name: "missing.png".into(),
        reason: "not found".into(),
    };
    assert!(loader.complete(token, Err(err)));
    assert!(loader.handle().is_failed());
    match loader.handle() {
        ImageHandle::Failed { source, message } => {
            assert_eq!(source, "missing.png");
            assert!(message.contains("not found"));
        }
        other => panic!("unexpected handle {other:?}"),
    }
}

#[test]
fn test_loader_timeout() {
    let mut loader = ImageLoader::with_timeout(Some(Duration::from_secs(5)));
    let start = Instant::now();
    let token = loader.request_at("slow.png", start);

    assert!(!loader.expire(start + Duration::from_secs(4)));
    assert!(loader.handle().is_loading());
    assert!(loader.expire(start + Duration::from_secs(5)));
    assert!(loader.handle().is_failed());

    // The real result arriving later does not resurrect the request.
    assert!(!loader.complete(token, Ok(common::solid_image(1, 1, [0, 0, 0, 255]))));
    assert!(loader.handle().is_failed());
}

#[test]
fn test_loader_without_timeout_never_expires() {
    let mut loader = ImageLoader::new();
    let start = Instant::now();
    loader.request_at("slow.png", start);
    assert!(!loader.expire(start + Duration::from_secs(3600)));
    assert!(loader.handle().is_loading());
}

#[test]
fn test_decode_image_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slide.png");
    common::split_image(6, 3).save(&path).unwrap();
    let img = decode_image(&path).unwrap();
    assert_eq!(img.dimensions(), (6, 3));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 2).0, [0, 0, 255, 255]);
}

#[test]
fn test_decode_image_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = decode_image(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, HemascopeError::ImageLoad { .. }));
}

#[test]
fn test_decode_bytes_rejects_garbage() {
    assert!(decode_bytes(b"definitely not an image").is_err());
}

#[test]
fn test_image_dimensions_reads_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slide.png");
    common::solid_image(12, 7, [9, 9, 9, 255]).save(&path).unwrap();
    let size = hemascope_core::image_handle::image_dimensions(&path).unwrap();
    assert_eq!((size.width, size.height), (12, 7));
}
