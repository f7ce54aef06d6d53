mod common;

use common::{question, test, FakeBackend};
use oge_admin::libpanel::model::{ContentBlock, NewsItem, Section};
use oge_admin::libpanel::transfer::{export, import, ImportReport, TransferDocument};

#[test]
fn export_collects_everything() {
    let backend = FakeBackend::with_tests(vec![test("t1", "Quiz", vec![question("q1", "?")])]);
    let panel = backend.panel();

    let document = export(panel.api()).unwrap();

    assert_eq!(document.tests, backend.tests());
    assert!(document.news.is_empty());
    assert_eq!(document.content, Some(ContentBlock::default()));
    assert_eq!(backend.calls(), ["GET /api/tests", "GET /api/news", "GET /api/content"]);
}

#[test]
fn export_propagates_network_failures() {
    let backend = FakeBackend::new();
    backend.set_down(true);
    let panel = backend.panel();
    assert!(export(panel.api()).is_err());
}

#[test]
fn import_skips_invalid_entities() {
    let mut broken = question("q2", "broken");
    broken.correct = 7;
    let document = TransferDocument {
        tests: vec![
            test("old-1", "Orthoepy", vec![question("q1", "ok")]),
            test("old-2", "Broken", vec![broken]),
        ],
        news: vec![NewsItem {
            id: "n1".to_string(),
            title: "Start".to_string(),
            content: "We are live".to_string(),
            date: "2025-01-09".to_string(),
        }],
        content: Some(ContentBlock {
            about: Section {
                title: "About".to_string(),
                content: "Made for ninth graders".to_string(),
            },
            theory: Section::default(),
        }),
    };
    let backend = FakeBackend::new();
    let panel = backend.panel();

    let report = import(panel.api(), &document);

    assert_eq!(
        report,
        ImportReport {
            created: 2,
            skipped: 1,
            failed: 0,
            content_replaced: true,
        }
    );
    assert_eq!(backend.calls(), ["POST /api/tests", "POST /api/news", "PUT /api/content"]);
    let tests = backend.tests();
    assert_eq!(tests[0].title, "Orthoepy");
    assert_eq!(tests[0].id, "srv-1");
    assert!(backend.requests()[0].body.as_ref().unwrap().get("id").is_none());
    assert_eq!(backend.content().about.content, "Made for ninth graders");
}

#[test]
fn import_counts_server_rejections() {
    let backend = FakeBackend::new();
    backend.fail_writes(true);
    let panel = backend.panel();
    let document: TransferDocument =
        serde_json::from_str(r#"{"tests":[{"id":"x","title":"T"}]}"#).unwrap();

    let report = import(panel.api(), &document);

    assert_eq!(report.failed, 1);
    assert!(!report.content_replaced);
}
