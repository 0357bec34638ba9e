//! Image stores through the public trait.

use crate::helpers::png_bytes;
use certdesigner::error::ImageError;
use certdesigner::images::{FsImageStore, ImageStore, MemoryImageStore, encode_data_url};
use certdesigner::types::ImageRef;
use image::ImageFormat;

#[tokio::test]
async fn test_fs_store_resolves_nested_references() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("logos")).unwrap();
    std::fs::write(dir.path().join("logos/uni.png"), png_bytes(12, 8, [0, 0, 0, 255])).unwrap();

    let store = FsImageStore::new(dir.path());
    let image = store.load_image(&ImageRef::new("logos/uni.png")).await.unwrap();
    assert_eq!((image.width(), image.height()), (12, 8));

    let err = store.load_image(&ImageRef::new("/etc/passwd")).await.unwrap_err();
    assert!(matches!(err, ImageError::OutsideRoot(_)));
}

#[tokio::test]
async fn test_data_urls_resolve_in_every_store() {
    let reference = encode_data_url(&png_bytes(3, 3, [255, 0, 0, 255]), ImageFormat::Png);
    let memory = MemoryImageStore::new();
    let dir = tempfile::tempdir().unwrap();
    let fs = FsImageStore::new(dir.path());

    assert_eq!(memory.load_image(&reference).await.unwrap().width(), 3);
    assert_eq!(fs.load_image(&reference).await.unwrap().width(), 3);
}

#[tokio::test]
async fn test_corrupt_bytes_are_decode_errors() {
    let store = MemoryImageStore::new();
    store.insert("broken.png", b"\x89PNG\r\n\x1a\nnot really".to_vec());
    let err = store.load_image(&ImageRef::new("broken.png")).await.unwrap_err();
    assert!(matches!(err, ImageError::Decode(_)));
}

#[tokio::test]
async fn test_upload_rejects_unsupported_bytes() {
    let store = MemoryImageStore::new();
    let err = store.upload(b"%PDF-1.7".to_vec()).await.unwrap_err();
    assert!(matches!(err, ImageError::Unsupported));
    assert!(store.is_empty());
}
