use photo_pdf::*;
use std::path::Path;

#[test]
fn test_default_options() {
    let options = ExportOptions::default();
    assert_eq!(options.page_size, PageSize::A4);
    assert_eq!(options.orientation, Orientation::Portrait);
    assert_eq!(options.margin, Margin::None);
    assert!(options.validate().is_ok());
}

#[test]
fn test_margin_points() {
    assert_eq!(Margin::None.points(), 0.0);
    assert_eq!(Margin::Small.points(), 20.0);
    assert_eq!(Margin::Medium.points(), 40.0);
}

#[test]
fn test_file_name_defaults_when_blank() {
    let mut options = ExportOptions::default();
    assert_eq!(options.file_name(), "converted-photos.pdf");

    options.output_name = "   ".to_string();
    assert_eq!(options.file_name(), "converted-photos.pdf");

    options.output_name = "  holiday 2026 ".to_string();
    assert_eq!(options.file_name(), "holiday 2026.pdf");
}

#[test]
fn test_validation_rejects_path_separators() {
    let options = ExportOptions {
        output_name: "a/b".to_string(),
        ..Default::default()
    };
    match options.validate() {
        Err(PhotoPdfError::Config(msg)) => assert!(msg.contains("path separators")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_every_preset_combination_is_valid() {
    for page_size in [PageSize::A4, PageSize::Letter] {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            for margin in [Margin::None, Margin::Small, Margin::Medium] {
                let options = ExportOptions {
                    page_size,
                    orientation,
                    margin,
                    ..Default::default()
                };
                assert!(options.validate().is_ok());
            }
        }
    }
}

#[test]
fn test_content_type_for_path() {
    assert_eq!(content_type_for_path(Path::new("a.JPG")), "image/jpeg");
    assert_eq!(content_type_for_path(Path::new("a.jpeg")), "image/jpeg");
    assert_eq!(content_type_for_path(Path::new("a.png")), "image/png");
    assert_eq!(content_type_for_path(Path::new("a.gif")), "image/gif");
    assert_eq!(
        content_type_for_path(Path::new("noext")),
        "application/octet-stream"
    );
}

#[test]
fn test_raster_format_from_content_type() {
    assert_eq!(
        RasterFormat::from_content_type("image/jpeg"),
        Some(RasterFormat::Jpeg)
    );
    assert_eq!(
        RasterFormat::from_content_type("image/JPG"),
        Some(RasterFormat::Jpeg)
    );
    assert_eq!(
        RasterFormat::from_content_type("Image/PNG"),
        Some(RasterFormat::Png)
    );
    assert_eq!(RasterFormat::from_content_type("image/webp"), None);
    assert_eq!(RasterFormat::from_content_type(""), None);
}

#[tokio::test]
async fn test_load_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, b"bytes").unwrap();

    let file = load_raw_file(&path).await.unwrap();
    assert_eq!(file.name, "scan.png");
    assert_eq!(file.content_type, "image/png");
    assert_eq!(file.bytes, b"bytes");

    let missing = load_raw_files(&[dir.path().join("missing.jpg")]).await;
    assert_eq!(missing.len(), 1);
    assert!(matches!(missing[0].1, Err(PhotoPdfError::Decode { .. })));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = ExportOptions {
        page_size: PageSize::Letter,
        orientation: Orientation::Landscape,
        margin: Margin::Medium,
        output_name: "album".to_string(),
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).await.unwrap();
    let loaded = ExportOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, r#"{ "margin": "Small" }"#).unwrap();

    let loaded = ExportOptions::load(&path).await.unwrap();
    assert_eq!(loaded.margin, Margin::Small);
    assert_eq!(loaded.page_size, PageSize::A4);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_invalid_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = ExportOptions::load(&path).await;
    assert!(matches!(result, Err(PhotoPdfError::Config(_))));
}
