use image::{DynamicImage, Rgb, RgbImage};
use photo_pdf::*;

fn jpeg_file(name: &str, width: u32, height: u32) -> RawFile {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 90, 90])));
    let bytes = render::encode(&img, RasterFormat::Jpeg).unwrap();
    RawFile::new(name, "image/jpeg", bytes)
}

async fn session_with(count: usize) -> Session {
    let mut session = Session::new();
    let files = (0..count)
        .map(|i| jpeg_file(&format!("{}.jpg", i), 12, 8))
        .collect();
    let report = session.add_files(files).await;
    assert!(report.failures.is_empty());
    session
}

#[tokio::test]
async fn test_export_of_empty_session_is_rejected() {
    let mut session = Session::new();
    let result = session
        .export(&ExportOptions::default(), ExportTarget::Download, |_| {})
        .await;

    assert!(matches!(result, Err(PhotoPdfError::EmptyCollection)));
    assert!(session.artifact().is_none());
    assert!(!session.is_building());
    assert!(session.collection().is_empty());
}

#[tokio::test]
async fn test_second_build_is_rejected_while_one_is_in_flight() {
    let mut session = session_with(2).await;
    let options = ExportOptions::default();

    let ticket = session.begin_build(&options, ExportTarget::Preview).unwrap();
    assert!(session.is_building());
    assert!(matches!(
        session.begin_build(&options, ExportTarget::Preview),
        Err(PhotoPdfError::BuildInProgress)
    ));

    let result = ticket.build(|_| {}).await;
    session.finish_build(ticket, result).unwrap();
    assert!(!session.is_building());
    assert!(session.begin_build(&options, ExportTarget::Preview).is_ok());
}

#[tokio::test]
async fn test_build_uses_snapshot_taken_at_start() {
    let mut session = session_with(3).await;
    let ids = session.collection().ids();

    let ticket = session
        .begin_build(&ExportOptions::default(), ExportTarget::Download)
        .unwrap();

    // Edits after the build started do not reach the snapshot
    session.remove(ids[0]).unwrap();
    session.move_image(ids[2], -1).unwrap();

    let snapshot_ids: Vec<_> = ticket.images().iter().map(|img| img.id()).collect();
    assert_eq!(snapshot_ids, ids);

    let result = ticket.build(|_| {}).await;
    let artifact = session.finish_build(ticket, result).unwrap();
    assert_eq!(artifact.page_count, 3);
    assert_eq!(session.collection().len(), 2);
}

#[tokio::test]
async fn test_failed_build_leaves_state_intact() {
    let mut session = session_with(2).await;
    let first = session
        .export(&ExportOptions::default(), ExportTarget::Download, |_| {})
        .await
        .unwrap()
        .bytes
        .clone();

    let ticket = session
        .begin_build(&ExportOptions::default(), ExportTarget::Download)
        .unwrap();
    let result = session.finish_build(ticket, Err(PhotoPdfError::Build("boom".to_string())));
    assert!(matches!(result, Err(PhotoPdfError::Build(_))));

    assert!(!session.is_building());
    assert_eq!(session.collection().len(), 2);
    assert_eq!(session.artifact().unwrap().bytes, first);
}

#[tokio::test]
async fn test_new_artifact_replaces_previous() {
    let mut session = session_with(1).await;

    let options = ExportOptions {
        output_name: "first".to_string(),
        ..Default::default()
    };
    session
        .export(&options, ExportTarget::Preview, |_| {})
        .await
        .unwrap();
    assert_eq!(session.artifact().unwrap().file_name, "first.pdf");

    let options = ExportOptions {
        output_name: "second".to_string(),
        ..Default::default()
    };
    session
        .export(&options, ExportTarget::Download, |_| {})
        .await
        .unwrap();

    let artifact = session.artifact().unwrap();
    assert_eq!(artifact.file_name, "second.pdf");
    assert_eq!(artifact.target, ExportTarget::Download);
}

#[tokio::test]
async fn test_dismiss_preview_only_releases_previews() {
    let mut session = session_with(1).await;

    session
        .export(&ExportOptions::default(), ExportTarget::Download, |_| {})
        .await
        .unwrap();
    assert!(!session.dismiss_preview());
    assert!(session.artifact().is_some());

    session
        .export(&ExportOptions::default(), ExportTarget::Preview, |_| {})
        .await
        .unwrap();
    assert!(session.dismiss_preview());
    assert!(session.artifact().is_none());
}

#[tokio::test]
async fn test_clear_releases_artifact() {
    let mut session = session_with(2).await;
    session
        .export(&ExportOptions::default(), ExportTarget::Preview, |_| {})
        .await
        .unwrap();

    session.clear();
    assert!(session.collection().is_empty());
    assert!(session.artifact().is_none());
}

#[tokio::test]
async fn test_invalid_options_are_rejected_before_building() {
    let mut session = session_with(1).await;
    let options = ExportOptions {
        output_name: "../escape".to_string(),
        ..Default::default()
    };

    let result = session.begin_build(&options, ExportTarget::Download);
    assert!(matches!(result, Err(PhotoPdfError::Config(_))));
    assert!(!session.is_building());
}

#[tokio::test]
async fn test_build_started_before_clear_is_discarded() {
    let mut session = session_with(2).await;
    let ticket = session
        .begin_build(&ExportOptions::default(), ExportTarget::Preview)
        .unwrap();

    session.clear();
    let result = ticket.build(|_| {}).await;
    assert!(result.is_ok());

    let finished = session.finish_build(ticket, result);
    assert!(matches!(finished, Err(PhotoPdfError::BuildDiscarded)));
    assert!(session.artifact().is_none());
    assert!(!session.is_building());

    // Builds started after the clear are stored as usual
    let report = session
        .add_files(vec![jpeg_file("again.jpg", 12, 8)])
        .await;
    assert_eq!(report.added.len(), 1);
    session
        .export(&ExportOptions::default(), ExportTarget::Preview, |_| {})
        .await
        .unwrap();
    assert_eq!(session.artifact().unwrap().page_count, 1);
}
