//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a finished
//! crawl: overview, page counts, artifacts written and page failures.

use crate::output::stats::CrawlReport;
use crate::PressError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a crawl
///
/// Parent directories are created as needed.
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(PressError)` - Failed to write the report
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> Result<(), PressError> {
    let markdown = format_markdown_report(report);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Sitepress Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", report.root_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!(
        "- **Concurrency**: {} max, {} peak\n",
        report.concurrency_limit, report.peak_concurrency
    ));
    if report.dry_run {
        md.push_str("- **Mode**: dry run\n");
    }
    md.push('\n');

    md.push_str("## Page Breakdown\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Visited | {} |\n", report.pages_visited()));
    md.push_str(&format!("| Rendered | {} |\n", report.pages_rendered));
    md.push_str(&format!(
        "| Navigation Failed | {} |\n",
        report.navigation_failures
    ));
    md.push_str(&format!("| Captured | {} |\n", report.pages_captured));
    md.push_str(&format!("| Capture Failed | {} |\n", report.capture_failures));
    md.push_str(&format!(
        "| Skipped (existing) | {} |\n",
        report.skipped_existing
    ));
    md.push_str(&format!("| Skipped (dry run) | {} |\n", report.dry_run_skips));
    md.push_str(&format!(
        "| Links Not Followed | {} |\n\n",
        report.links_rejected
    ));
    md.push_str(&format!(
        "**Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    if !report.artifacts.is_empty() {
        md.push_str("## Artifacts\n\n");
        md.push_str("| URL | File |\n");
        md.push_str("|-----|------|\n");
        for artifact in &report.artifacts {
            md.push_str(&format!(
                "| {} | {} |\n",
                artifact.url,
                artifact.path.display()
            ));
        }
        md.push('\n');
    }

    if !report.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Step | Reason |\n");
        md.push_str("|-----|------|--------|\n");
        for failure in &report.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.url,
                failure.kind,
                failure.reason.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md.push_str("## Visited Pages\n\n");
    md.push_str(&format!("Total visited: {}\n\n", report.visited.len()));
    for url in report.visited.iter().take(100) {
        md.push_str(&format!("- {}\n", url));
    }
    if report.visited.len() > 100 {
        md.push_str(&format!("\n... and {} more\n", report.visited.len() - 100));
    }

    md
}
