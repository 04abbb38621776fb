mod support;

use std::sync::Arc;

use attachment_core::DownloaderConfig;
use attachment_engine::{
    shared_archiver, AttachmentDownloader, ConfigError, HtmlRegionProvider, InsertedControl,
};
use pretty_assertions::assert_eq;
use support::{init_logging, page, FakeFetcher, RecordingSink};

fn build(html: &str, config: DownloaderConfig) -> (AttachmentDownloader, Arc<HtmlRegionProvider>) {
    let provider = Arc::new(HtmlRegionProvider::new(html));
    let downloader = AttachmentDownloader::new(
        config,
        provider.clone(),
        Arc::new(FakeFetcher::new()),
        RecordingSink::new(),
    );
    (downloader, provider)
}

#[tokio::test]
async fn every_region_gets_a_trigger() {
    init_logging();
    let html = page(&[&["/portal/file/1/a.pdf"], &[], &["/portal/file/2/b.pdf"]]);
    let config = DownloaderConfig::new("table.att", "caption").with_button_text("Download");
    let (downloader, provider) = build(&html, config);

    let controls = downloader.initialize().await.unwrap();

    let ids: Vec<_> = controls.iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids, vec!["download-0", "download-1", "download-2"]);
    assert!(controls.iter().all(|c| c.view().enabled));
    assert_eq!(
        provider.inserted_controls()[1],
        InsertedControl {
            control_id: "download-1".to_string(),
            region: 1,
            anchor_selector: "caption".to_string(),
            label: "Download".to_string(),
        }
    );
}

#[tokio::test]
async fn missing_table_selector_aborts_initialization() {
    init_logging();
    let config = DownloaderConfig {
        button_position_selector: Some("caption".to_string()),
        ..DownloaderConfig::default()
    };
    let (downloader, provider) = build(&page(&[&[]]), config);

    let err = downloader.initialize().await.unwrap_err();

    assert_eq!(err, ConfigError::MissingTableSelector);
    assert!(provider.inserted_controls().is_empty());
}

#[tokio::test]
async fn page_without_regions_is_a_config_error() {
    init_logging();
    let (downloader, _provider) = build(
        "<html><body><p>nothing</p></body></html>",
        DownloaderConfig::new("table.att", "caption"),
    );

    let err = downloader.initialize().await.unwrap_err();
    assert_eq!(err, ConfigError::NoRegions("table.att".to_string()));
}

#[tokio::test]
async fn invalid_selectors_are_rejected() {
    init_logging();
    let (downloader, _provider) = build(
        &page(&[&[]]),
        DownloaderConfig::new("table.att", "caption").with_national_code_selector("[["),
    );

    let err = downloader.initialize().await.unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSelector(ref e) if e.selector == "[["));
}

#[tokio::test]
async fn regions_without_insertion_point_are_skipped() {
    init_logging();
    let html = format!(
        "{}<table class=\"att\"><tr><td><a href=\"/portal/file/9/z.pdf\">z</a></td></tr></table>",
        page(&[&["/portal/file/1/a.pdf"]])
    );
    let (downloader, provider) = build(&html, DownloaderConfig::new("table.att", "caption"));

    let controls = downloader.initialize().await.unwrap();

    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].region().index, 0);
    assert_eq!(provider.inserted_controls().len(), 1);
}

#[tokio::test]
async fn missing_position_selector_skips_every_region() {
    init_logging();
    let config = DownloaderConfig {
        table_selector: Some("table.att".to_string()),
        ..DownloaderConfig::default()
    };
    let (downloader, provider) = build(&page(&[&[], &[]]), config);

    let controls = downloader.initialize().await.unwrap();

    assert!(controls.is_empty());
    assert!(provider.inserted_controls().is_empty());
}

#[tokio::test]
async fn archive_capability_is_loaded_once() {
    init_logging();
    let (first, second, third) = tokio::join!(shared_archiver(), shared_archiver(), shared_archiver());

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &third));
}
