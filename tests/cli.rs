mod catalog_stub;

use std::fs;

use catalog_stub::{CatalogStub, CatalogStubConfig, SAMPLE_CATALOG, StubResponse};
use predicates::prelude::*;

#[test]
fn render_writes_every_view_for_persisted_document() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let document = temp.path().join("catalog.json");
    let out = temp.path().join("catalog.html");
    fs::write(&document, SAMPLE_CATALOG)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.args([
        "render",
        "--document",
        document.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .assert()
    .success();

    let html = fs::read_to_string(&out)?;
    assert!(html.contains("JSON Structure"));
    assert!(html.contains("5 products in 2 groups"));
    assert!(html.contains("B &gt; B1"));
    assert!(html.contains("Hardcover: Yes"));
    assert!(html.contains("Pages: N/A"));
    assert!(html.contains("NodeID: 1 | Name: Cover"));

    Ok(())
}

#[test]
fn render_without_document_prints_recovery_page_and_fails() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let document = temp.path().join("missing.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.args(["render", "--document", document.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Catalog file not found at:"))
        .stdout(predicate::str::contains("catalogview fetch --document"))
        .stderr(predicate::str::contains("catalog document not found"));

    Ok(())
}

#[test]
fn render_document_without_categories_shows_no_products() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let document = temp.path().join("catalog.json");
    fs::write(&document, r#"{"Version": "2024-01"}"#)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.args(["render", "--document", document.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products found."));

    Ok(())
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let document = temp.path().join("catalog.json");
    fs::write(&document, "{}")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.env("RUST_LOG", "debug")
        .args(["render", "--document", document.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));

    Ok(())
}

#[test]
fn fetch_without_credentials_fails_before_any_request() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let document = temp.path().join("catalog.json");
    let error_log = temp.path().join("errors.log");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.env_remove("CATALOGVIEW_CONSUMER_KEY")
        .env_remove("CATALOGVIEW_CONSUMER_SECRET")
        .args([
            "fetch",
            "--document",
            document.to_str().unwrap(),
            "--error-log",
            error_log.to_str().unwrap(),
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CATALOGVIEW_CONSUMER_KEY is not set"));

    assert!(!document.exists());
    assert!(fs::read_to_string(&error_log)?.contains("configuration:"));

    Ok(())
}

#[test]
fn fetch_then_render_round_trip() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = CatalogStub::spawn(CatalogStubConfig {
        token: StubResponse::new(200, r#"{"Token": "abc123"}"#),
        catalog: StubResponse::new(200, SAMPLE_CATALOG),
    });
    let document = temp.path().join("catalog.json");
    let error_log = temp.path().join("errors.log");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.env("CATALOGVIEW_CONSUMER_KEY", "test-key")
        .env("CATALOGVIEW_CONSUMER_SECRET", "test-secret")
        .args([
            "fetch",
            "--document",
            document.to_str().unwrap(),
            "--error-log",
            error_log.to_str().unwrap(),
            "--base-url",
            stub.base_url.as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog saved to:"))
        .stdout(predicate::str::contains("Total products: 5 in 2 groups"));

    assert_eq!(fs::read_to_string(&document)?, SAMPLE_CATALOG);
    assert!(!error_log.exists());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.args(["render", "--document", document.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Max Depth"));

    Ok(())
}

#[test]
fn fetch_failure_exits_non_zero_and_logs() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = CatalogStub::spawn(CatalogStubConfig {
        token: StubResponse::new(500, "oops"),
        catalog: StubResponse::new(200, SAMPLE_CATALOG),
    });
    let document = temp.path().join("catalog.json");
    let error_log = temp.path().join("errors.log");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalogview");
    cmd.env("CATALOGVIEW_CONSUMER_KEY", "test-key")
        .env("CATALOGVIEW_CONSUMER_SECRET", "test-secret")
        .args([
            "fetch",
            "--document",
            document.to_str().unwrap(),
            "--error-log",
            error_log.to_str().unwrap(),
            "--base-url",
            stub.base_url.as_str(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP status 500"));

    assert!(!document.exists());
    assert!(fs::read_to_string(&error_log)?.contains("request_access_token: HTTP status 500"));

    Ok(())
}
