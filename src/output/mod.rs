//! Output module for artifact naming and crawl reports
//!
//! This module handles:
//! - Naming capture artifacts deterministically
//! - Recording crawl statistics while the crawl runs
//! - Printing and writing the final crawl report

mod markdown;
mod naming;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use naming::{artifact_name, MAX_STEM_BYTES};
pub use stats::{
    print_report, ArtifactRecord, CrawlReport, CrawlStats, FailureKind, FailureRecord, RunInfo,
};
