use super::*;
use crate::vendors::canonical::Finish;
use httpmock::prelude::*;

const CLASSIC_PAGE: &str = include_str!("../../../tests/fixtures/stonebasyx_classic.html");
const MISSING_BUNDLE_PAGE: &str = include_str!("../../../tests/fixtures/stonebasyx_missing_bundle.html");
const BUNDLE_REMOVED_PAGE: &str = include_str!("../../../tests/fixtures/stonebasyx_bundle_removed.html");

const CLASSIC_URL: &str = "https://www.stonebasyx.com/live-inventory/product-details/?selproductid=536";

#[test]
fn test_default_pages() {
    let pages = default_pages();
    let names: Vec<_> = pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Classic", "Honed", "Leather"]);
    assert_eq!(pages[0].url, CLASSIC_URL);
    assert!(pages[2].url.ends_with("selproductid=712"));
}

#[test]
fn test_scan_classic_page() {
    let slabs = scan_page(CLASSIC_PAGE, CLASSIC_URL, &ScanMarkers::default()).unwrap();

    assert_eq!(slabs.len(), 2);

    let first = &slabs[0];
    assert_eq!(first.lot, "1041");
    assert_eq!(first.bundle, "A");
    assert_eq!(first.length, 131.0);
    assert_eq!(first.width, 77.0);
    assert_eq!(first.count, 6);
    assert_eq!(first.color, "Black, White");
    assert_eq!(first.finish, Finish::Polished);
    assert_eq!(first.thickness, 3.0);
    assert_eq!(first.vendor, Vendor::StoneBasyx);
    assert_eq!(first.url, CLASSIC_URL);
    assert_eq!(
        first.photo,
        "https://www.stonebasyx.com/images/inventory/1041-A.jpg"
    );

    let second = &slabs[1];
    assert_eq!(second.lot, "1187");
    assert_eq!(second.bundle, "C");
    assert_eq!(second.length, 136.0);
    assert_eq!(second.count, 3);
    assert_eq!(
        second.photo,
        "https://www.stonebasyx.com/live-inventory/product-details/thumbs/1187-C.jpg"
    );
}

#[test]
fn test_scan_ignores_blocks_after_content_end() {
    let slabs = scan_page(CLASSIC_PAGE, CLASSIC_URL, &ScanMarkers::default()).unwrap();
    assert!(slabs.iter().all(|s| s.lot != "9999"));
}

#[test]
fn test_scan_is_deterministic() {
    let markers = ScanMarkers::default();
    let first = scan_page(CLASSIC_PAGE, CLASSIC_URL, &markers).unwrap();
    let second = scan_page(CLASSIC_PAGE, CLASSIC_URL, &markers).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_bundle_fails_page() {
    let err = scan_page(MISSING_BUNDLE_PAGE, CLASSIC_URL, &ScanMarkers::default()).unwrap_err();

    assert_eq!(
        err,
        ScanError::MissingField {
            field: BlockField::Bundle,
            line: 12
        }
    );
    assert!(err.to_string().contains("Bundle"));
}

#[test]
fn test_removed_bundle_line_fails_page() {
    // The block shifts up by one line, so the Bundle read lands on a spacer
    let err = scan_page(BUNDLE_REMOVED_PAGE, CLASSIC_URL, &ScanMarkers::default()).unwrap_err();

    assert_eq!(
        err,
        ScanError::MissingField {
            field: BlockField::Bundle,
            line: 12
        }
    );
    assert!(err.to_string().contains("Bundle"));
}

#[tokio::test]
async fn test_adapter_skips_unreachable_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/classic");
            then.status(200).body(CLASSIC_PAGE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/honed");
            then.status(404);
        })
        .await;

    let adapter = StoneBasyxAdapter::new(
        vec![
            StoneBasyxPage::new("Honed", server.url("/honed")),
            StoneBasyxPage::new("Classic", server.url("/classic")),
        ],
        ScanMarkers::default(),
    );

    let slabs = adapter.fetch(&reqwest::Client::new()).await.unwrap();
    assert_eq!(slabs.len(), 2);
    assert_eq!(slabs[0].url, server.url("/classic"));
}

#[tokio::test]
async fn test_adapter_parse_error_fails_adapter() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/classic");
            then.status(200).body(CLASSIC_PAGE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/leather");
            then.status(200).body(MISSING_BUNDLE_PAGE);
        })
        .await;

    let adapter = StoneBasyxAdapter::new(
        vec![
            StoneBasyxPage::new("Classic", server.url("/classic")),
            StoneBasyxPage::new("Leather", server.url("/leather")),
        ],
        ScanMarkers::default(),
    );

    let err = adapter.fetch(&reqwest::Client::new()).await.unwrap_err();
    match err {
        SlabError::Parse { page, message } => {
            assert_eq!(page, "Leather");
            assert!(message.contains("Bundle"), "message: {}", message);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}
