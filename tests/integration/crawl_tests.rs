//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full crawl
//! cycle end-to-end through the HTTP renderer.

use sitepress::config::Config;
use sitepress::crawler::{crawl, Coordinator, HttpRenderer};
use sitepress::output::artifact_name;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Serves a small site:
///
/// ```text
/// /            -> /docs/, /about, /missing (404), plus links that must not be followed
/// /docs/       -> /docs/guide, /
/// /docs/guide  -> /about
/// /about       -> (nothing)
/// ```
async fn start_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r##"<html><head><title>Home</title></head><body>
            <a href="/docs/">Docs</a>
            <a href="/docs/#intro">Docs intro</a>
            <a href="about">About</a>
            <a href="/missing">Missing</a>
            <a href="/logo.png">Logo</a>
            <a href="/private/area">Private</a>
            <a href="http://other.invalid/x">Elsewhere</a>
            <a href="mailto:team@site.example">Mail</a>
            <a href="#top">Top</a>
            <div id="cookie-banner"><a href="/cookie-settings">Cookie settings</a></div>
        </body></html>"##,
    )
    .await;

    mount_page(
        &server,
        "/docs/",
        r#"<html><head><title>Docs</title></head><body>
            <a href="guide">Guide</a>
            <a href="/">Home</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        &server,
        "/docs/guide",
        r#"<html><head><title>Guide</title><script>track()</script></head><body>
            <a href="../about">About</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        &server,
        "/about",
        r#"<html><head><title>About</title></head><body>About us</body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    for never in ["/logo.png", "/private/area", "/cookie-settings"] {
        Mock::given(method("GET"))
            .and(path(never))
            .respond_with(html_page("<html></html>"))
            .expect(0)
            .mount(&server)
            .await;
    }

    server
}

fn artifact_path(server: &MockServer, dir: &Path, title: &str, route: &str) -> PathBuf {
    let url = url::Url::parse(&format!("{}{}", server.uri(), route)).unwrap();
    dir.join(artifact_name(Some(title), &url))
}

fn create_test_config(server: &MockServer, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.root_url = Some(format!("{}/", server.uri()));
    config.crawler.max_concurrent_pages = 2;
    config.crawler.exclude = vec!["/private".to_string()];
    config.crawler.navigation_timeout = 5;
    config.capture.output_dir = output_dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_full_crawl_captures_same_origin_pages() {
    let server = start_site().await;
    let dir = TempDir::new().unwrap();

    let report = crawl(create_test_config(&server, dir.path()))
        .await
        .unwrap();

    assert_eq!(report.pages_visited(), 5);
    assert_eq!(report.pages_rendered, 4);
    assert_eq!(report.navigation_failures, 1);
    assert_eq!(report.pages_captured, 4);
    assert_eq!(report.capture_failures, 0);
    assert!(report.peak_concurrency <= 2);

    for (title, route) in [
        ("Home", "/"),
        ("Docs", "/docs/"),
        ("Guide", "/docs/guide"),
        ("About", "/about"),
    ] {
        let artifact = artifact_path(&server, dir.path(), title, route);
        assert!(artifact.exists(), "missing artifact {}", artifact.display());
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);

    let missing = report
        .failures
        .iter()
        .find(|f| f.url.ends_with("/missing"))
        .unwrap();
    assert!(missing.reason.contains("404"));
}

#[tokio::test]
async fn test_artifact_is_a_settled_snapshot() {
    let server = start_site().await;
    let dir = TempDir::new().unwrap();

    crawl(create_test_config(&server, dir.path()))
        .await
        .unwrap();

    let guide = std::fs::read_to_string(artifact_path(&server, dir.path(), "Guide", "/docs/guide")).unwrap();
    assert!(!guide.contains("<script"));
    assert!(guide.contains(r#"name="color-scheme""#));
    assert!(guide.contains(&format!(r#"<base href="{}/docs/guide">"#, server.uri())));

    let home = std::fs::read_to_string(artifact_path(&server, dir.path(), "Home", "/")).unwrap();
    assert!(!home.contains("cookie-settings"));
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let server = start_site().await;
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("press");

    let mut config = create_test_config(&server, &output_dir);
    config.crawler.dry_run = true;
    let report = crawl(config).await.unwrap();

    assert_eq!(report.pages_visited(), 5);
    assert_eq!(report.pages_captured, 0);
    assert_eq!(report.dry_run_skips, 4);
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_skip_existing_keeps_previous_artifacts() {
    let server = start_site().await;
    let dir = TempDir::new().unwrap();
    let about = artifact_path(&server, dir.path(), "About", "/about");
    std::fs::write(&about, "from an earlier run").unwrap();

    let mut config = create_test_config(&server, dir.path());
    config.crawler.skip_existing = true;
    let report = crawl(config).await.unwrap();

    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.pages_captured, 3);
    assert_eq!(
        std::fs::read_to_string(&about).unwrap(),
        "from an earlier run"
    );
}

#[tokio::test]
async fn test_coordinator_with_http_renderer() {
    let server = start_site().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    let renderer = Arc::new(HttpRenderer::new(&config).unwrap());
    let coordinator = Coordinator::new(config, renderer).unwrap();
    let report = coordinator.run().await.unwrap();

    assert!(coordinator.state().is_quiescent().unwrap());
    assert_eq!(coordinator.state().visited_count().unwrap(), 5);
    assert_eq!(report.visited.len(), 5);
    assert!(report
        .visited
        .iter()
        .all(|url| url.starts_with(&server.uri())));
}

#[tokio::test]
async fn test_unreachable_root_still_completes() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.crawler.root_url = Some("http://127.0.0.1:9/".to_string());
    config.crawler.navigation_timeout = 2;
    config.capture.output_dir = dir.path().to_path_buf();

    let report = crawl(config).await.unwrap();

    assert_eq!(report.pages_visited(), 1);
    assert_eq!(report.navigation_failures, 1);
    assert_eq!(report.pages_captured, 0);
}

#[tokio::test]
async fn test_query_variants_capture_to_separate_files() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Blog</title></head><body>
            <a href="/blog/?page=2">Older</a>
            <a href="/blog/?page=3">Oldest</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html_page(
            "<html><head><title>Blog</title></head><body>Posts</body></html>",
        ))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = crawl(create_test_config(&server, dir.path()))
        .await
        .unwrap();

    assert_eq!(report.pages_captured, 3);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    for route in ["/blog/?page=2", "/blog/?page=3"] {
        assert!(artifact_path(&server, dir.path(), "Blog", route).exists());
    }
}
