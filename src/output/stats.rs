//! Crawl statistics collected while a crawl runs
//!
//! This module provides the counters the coordinator updates from
//! concurrently running page tasks and the report produced when the crawl
//! finishes.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// An artifact written during the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub url: String,
    pub path: PathBuf,
}

/// Which step of processing a page failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Navigation,
    Capture,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Navigation => "navigation",
            FailureKind::Capture => "capture",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page-level failure; these never abort the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Live crawl counters, safe to update from any task
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_claimed: AtomicU64,
    pages_rendered: AtomicU64,
    navigation_failures: AtomicU64,
    links_rejected: AtomicU64,
    pages_captured: AtomicU64,
    capture_failures: AtomicU64,
    skipped_existing: AtomicU64,
    dry_run_skips: AtomicU64,
    artifacts: Mutex<Vec<ArtifactRecord>>,
    failures: Mutex<Vec<FailureRecord>>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_claimed(&self) {
        self.pages_claimed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of pages rendered so far, including this one
    pub fn record_rendered(&self) -> u64 {
        self.pages_rendered.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_navigation_failure(&self, url: &str, reason: &str) {
        self.navigation_failures.fetch_add(1, Ordering::Relaxed);
        self.push_failure(url, FailureKind::Navigation, reason);
    }

    pub fn record_rejected_link(&self) {
        self.links_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capture(&self, url: &str, path: PathBuf) {
        self.pages_captured.fetch_add(1, Ordering::Relaxed);
        self.artifacts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ArtifactRecord {
                url: url.to_string(),
                path,
            });
    }

    pub fn record_capture_failure(&self, url: &str, reason: &str) {
        self.capture_failures.fetch_add(1, Ordering::Relaxed);
        self.push_failure(url, FailureKind::Capture, reason);
    }

    pub fn record_skipped_existing(&self) {
        self.skipped_existing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dry_run_skip(&self) {
        self.dry_run_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_claimed(&self) -> u64 {
        self.pages_claimed.load(Ordering::Relaxed)
    }

    pub fn pages_rendered(&self) -> u64 {
        self.pages_rendered.load(Ordering::Relaxed)
    }

    pub fn pages_captured(&self) -> u64 {
        self.pages_captured.load(Ordering::Relaxed)
    }

    fn push_failure(&self, url: &str, kind: FailureKind, reason: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(FailureRecord {
                url: url.to_string(),
                kind,
                reason: reason.to_string(),
            });
    }

    /// Freezes the counters into a report
    ///
    /// Artifacts and failures are sorted by URL so reports are stable
    /// regardless of completion order.
    pub fn report(&self, run: RunInfo) -> CrawlReport {
        let mut artifacts = self
            .artifacts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        artifacts.sort_by(|a, b| a.url.cmp(&b.url));

        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        failures.sort_by(|a, b| a.url.cmp(&b.url).then(a.kind.as_str().cmp(b.kind.as_str())));

        CrawlReport {
            root_url: run.root_url,
            started_at: run.started_at,
            finished_at: run.finished_at,
            dry_run: run.dry_run,
            concurrency_limit: run.concurrency_limit,
            peak_concurrency: run.peak_concurrency,
            visited: run.visited,
            pages_rendered: self.pages_rendered.load(Ordering::Relaxed),
            navigation_failures: self.navigation_failures.load(Ordering::Relaxed),
            links_rejected: self.links_rejected.load(Ordering::Relaxed),
            pages_captured: self.pages_captured.load(Ordering::Relaxed),
            capture_failures: self.capture_failures.load(Ordering::Relaxed),
            skipped_existing: self.skipped_existing.load(Ordering::Relaxed),
            dry_run_skips: self.dry_run_skips.load(Ordering::Relaxed),
            artifacts,
            failures,
        }
    }
}

/// Run-level facts the coordinator supplies when building a report
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub root_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub concurrency_limit: usize,
    pub peak_concurrency: usize,
    pub visited: Vec<String>,
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub concurrency_limit: usize,
    pub peak_concurrency: usize,

    /// Every URL claimed during the run, sorted
    pub visited: Vec<String>,

    pub pages_rendered: u64,
    pub navigation_failures: u64,
    pub links_rejected: u64,
    pub pages_captured: u64,
    pub capture_failures: u64,
    pub skipped_existing: u64,
    pub dry_run_skips: u64,
    pub artifacts: Vec<ArtifactRecord>,
    pub failures: Vec<FailureRecord>,
}

impl CrawlReport {
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Percentage of visited pages that rendered
    pub fn success_rate(&self) -> f64 {
        if self.visited.is_empty() {
            0.0
        } else {
            (self.pages_rendered as f64 / self.visited.len() as f64) * 100.0
        }
    }
}

/// Prints a crawl report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Root URL: {}", report.root_url);
    println!(
        "  Duration: {:.2}s ({} concurrent pages max, {} peak)",
        report.duration_seconds(),
        report.concurrency_limit,
        report.peak_concurrency
    );
    if report.dry_run {
        println!("  Mode: dry run (no artifacts written)");
    }
    println!();

    println!("Pages:");
    println!("  Visited: {}", report.pages_visited());
    println!("  Rendered: {}", report.pages_rendered);
    println!("  Navigation failures: {}", report.navigation_failures);
    println!("  Links not followed: {}", report.links_rejected);
    println!();

    println!("Artifacts:");
    println!("  Captured: {}", report.pages_captured);
    println!("  Skipped (already present): {}", report.skipped_existing);
    if report.dry_run {
        println!("  Skipped (dry run): {}", report.dry_run_skips);
    }
    println!("  Capture failures: {}", report.capture_failures);
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for failure in report.failures.iter().take(20) {
            println!("  - [{}] {}: {}", failure.kind, failure.url, failure.reason);
        }
        if report.failures.len() > 20 {
            println!("  ... and {} more", report.failures.len() - 20);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages rendered)",
        report.success_rate(),
        report.pages_rendered,
        report.pages_visited()
    );
}
