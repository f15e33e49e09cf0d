//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the recursive unit of work that drives a crawl:
//! - Claiming each canonical URL exactly once
//! - Rendering the page and filtering the links it returns
//! - Capturing the page through the renderer
//! - Submitting newly discovered pages back to the scheduler
//! - Detecting completion and producing the crawl report

use crate::config::{require_root_url, Config};
use crate::crawler::http_renderer::HttpRenderer;
use crate::crawler::renderer::{CaptureOptions, PageHandle, Renderer};
use crate::crawler::scheduler::Scheduler;
use crate::output::{artifact_name, CrawlReport, CrawlStats, RunInfo};
use crate::state::CrawlState;
use crate::url::CrawlScope;
use crate::PressError;
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
///
/// Shared by every running page task through an `Arc`.
pub struct Coordinator {
    scope: CrawlScope,
    state: CrawlState,
    scheduler: Scheduler,
    renderer: Arc<dyn Renderer>,
    stats: CrawlStats,
    output_dir: PathBuf,
    capture_options: CaptureOptions,
    dry_run: bool,
    skip_existing: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; must name a root URL
    /// * `renderer` - Opens and captures pages
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Coordinator>)` - Ready to run
    /// * `Err(PressError)` - The configuration is invalid
    pub fn new(config: Config, renderer: Arc<dyn Renderer>) -> Result<Arc<Self>, PressError> {
        let root = require_root_url(&config)?;
        let scope = CrawlScope::new(root, config.crawler.exclude.clone())?;

        tracing::debug!(
            "Crawl scope: root {}, origin {}, {} exclusion(s)",
            scope.root(),
            scope.origin_root(),
            config.crawler.exclude.len()
        );

        Ok(Arc::new(Self {
            scope,
            state: CrawlState::new(),
            scheduler: Scheduler::new(config.crawler.max_concurrent_pages),
            renderer,
            stats: CrawlStats::new(),
            capture_options: CaptureOptions::from(&config.capture),
            output_dir: config.capture.output_dir,
            dry_run: config.crawler.dry_run,
            skip_existing: config.crawler.skip_existing,
        }))
    }

    /// Runs the crawl from the root URL until nothing is left to do
    ///
    /// Page-level failures are logged and counted; only infrastructure
    /// failures end the run with an error. A coordinator crawls once: a
    /// second call finds the root already claimed and returns immediately.
    pub async fn run(self: &Arc<Self>) -> Result<CrawlReport, PressError> {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl of {} with up to {} concurrent pages{}",
            self.scope.root(),
            self.scheduler.limit(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        self.enqueue(self.scope.root().clone())?;
        self.scheduler.wait_idle().await?;

        if !self.state.is_quiescent()? {
            let pending = self.state.pending_count()?;
            for (url, status) in self.state.pending_snapshot()? {
                tracing::error!("Still pending after crawl went idle: {} ({})", url, status);
            }
            return Err(PressError::Stalled { pending });
        }

        let visited: Vec<String> = self
            .state
            .visited_urls()?
            .into_iter()
            .map(String::from)
            .collect();

        let report = self.stats.report(RunInfo {
            root_url: self.scope.root().to_string(),
            started_at,
            finished_at: Utc::now(),
            dry_run: self.dry_run,
            concurrency_limit: self.scheduler.limit(),
            peak_concurrency: self.scheduler.peak_running(),
            visited,
        });

        tracing::info!(
            "Crawl complete: {} pages visited, {} captured, {} navigation failures in {:.2}s",
            report.pages_visited(),
            report.pages_captured,
            report.navigation_failures,
            report.duration_seconds()
        );

        Ok(report)
    }

    /// Claims `url` and, if this call won the claim, submits it for processing
    ///
    /// Returns whether work was submitted.
    pub fn enqueue(self: &Arc<Self>, url: Url) -> Result<bool, PressError> {
        if !self.state.try_claim(&url)? {
            tracing::trace!("Already claimed: {}", url);
            return Ok(false);
        }
        self.stats.record_claimed();

        let this = Arc::clone(self);
        self.scheduler.submit(async move { this.process(url).await });
        Ok(true)
    }

    /// Processes one claimed URL; the unit of work run by the scheduler
    async fn process(self: Arc<Self>, url: Url) -> Result<(), PressError> {
        self.state.start(&url)?;
        let outcome = self.visit(&url).await;
        let finished = self.state.finish(&url);
        outcome.and(finished)
    }

    async fn visit(self: &Arc<Self>, url: &Url) -> Result<(), PressError> {
        tracing::debug!("Visiting {}", url);
        let rendered = self.renderer.render(url).await;

        let page = match rendered.page {
            Some(page) => page,
            None => {
                let reason = rendered
                    .failure
                    .unwrap_or_else(|| "unknown failure".to_string());
                tracing::warn!("Navigation to {} failed: {}", url, reason);
                self.stats.record_navigation_failure(url.as_str(), &reason);
                return Ok(());
            }
        };

        let rendered_count = self.stats.record_rendered();
        if rendered_count % 10 == 0 {
            tracing::info!(
                "Progress: {} pages rendered, {} in flight or queued",
                rendered_count,
                self.scheduler.outstanding()
            );
        }

        let discovered = self.discover(url, &rendered.links);
        self.capture(&page).await;

        for link in discovered {
            self.enqueue(link)?;
        }
        Ok(())
    }

    /// Canonicalizes and deduplicates the raw links found on `page_url`
    fn discover(&self, page_url: &Url, links: &[String]) -> BTreeSet<Url> {
        let mut discovered = BTreeSet::new();
        for link in links {
            match self.scope.canonicalize(link, page_url) {
                Ok(canonical) => {
                    discovered.insert(canonical);
                }
                Err(rejection) => {
                    tracing::debug!("Not following {:?} on {}: {}", link, page_url, rejection);
                    self.stats.record_rejected_link();
                }
            }
        }
        discovered
    }

    async fn capture(&self, page: &PageHandle) {
        let path = self
            .output_dir
            .join(artifact_name(page.title.as_deref(), &page.url));

        if self.dry_run {
            tracing::debug!("Dry run, not capturing {} to {}", page.url, path.display());
            self.stats.record_dry_run_skip();
            return;
        }

        if self.skip_existing && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!("Skipping {}: {} already exists", page.url, path.display());
            self.stats.record_skipped_existing();
            return;
        }

        match self
            .renderer
            .capture(page, &path, &self.capture_options)
            .await
        {
            Ok(()) => {
                tracing::info!("Captured {} -> {}", page.url, path.display());
                self.stats.record_capture(page.url.as_str(), path);
            }
            Err(e) => {
                tracing::warn!("Capture of {} failed: {}", page.url, e);
                self.stats
                    .record_capture_failure(page.url.as_str(), &e.to_string());
            }
        }
    }

    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}

/// Runs a complete crawl over HTTP
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(PressError)` - Crawl could not start or failed fatally
///
/// # Example
///
/// ```no_run
/// use sitepress::config::load_config;
/// use sitepress::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sitepress.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} pages captured", report.pages_captured);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, PressError> {
    let renderer = Arc::new(HttpRenderer::new(&config)?);
    let coordinator = Coordinator::new(config, renderer)?;
    coordinator.run().await
}
