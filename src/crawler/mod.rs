//! Crawler module for page rendering and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - The renderer collaborator and its HTTP implementation
//! - HTML parsing, consent overlay dismissal and link extraction
//! - Snapshot capture
//! - Bounded scheduling of recursive page work
//! - Overall crawl coordination

mod capture;
mod consent;
mod coordinator;
mod fetcher;
mod http_renderer;
mod parser;
mod renderer;
mod scheduler;

pub use capture::{build_snapshot, media_applies};
pub use consent::dismiss_overlays;
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use http_renderer::HttpRenderer;
pub use parser::{parse_html, ParsedPage};
pub use renderer::{CaptureOptions, PageHandle, RenderResult, Renderer};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::PressError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and derive the crawl scope
/// 2. Build the HTTP renderer
/// 3. Render, capture and follow links until the site is exhausted
/// 4. Return the crawl report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(PressError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<CrawlReport, PressError> {
    run_crawl(config).await
}
