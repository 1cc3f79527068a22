//! Run summary for the console
//!
//! This module condenses a finished crawl and its export into the numbers a
//! user cares about and prints them once the run is over.

use crate::crawler::CrawlOutcome;
use crate::model::ImageDownload;
use crate::output::ExportReport;
use crate::state::DoneReason;

/// Summary of one complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Listing pages fetched successfully
    pub pages_visited: u32,

    /// Why pagination stopped
    pub done_reason: DoneReason,

    /// Category files written, with their record counts, in discovery order
    pub categories: Vec<(String, usize)>,

    /// Records written across all category files
    pub total_records: usize,

    /// Category files that could not be written
    pub failed_categories: Vec<String>,

    /// Products skipped because of an error
    pub failed_items: usize,

    pub images: ImageCounts,

    pub duration_secs: f64,

    /// Hash of the configuration file, when one was loaded
    pub config_hash: Option<String>,
}

/// Image download tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCounts {
    pub downloaded: usize,
    pub cached: usize,
    pub failed: usize,
}

impl ImageCounts {
    pub fn from_log(entries: &[ImageDownload]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            if entry.is_cached() {
                counts.cached += 1;
            } else if entry.downloaded {
                counts.downloaded += 1;
            } else if !entry.image_url.is_empty() {
                counts.failed += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.cached + self.failed
    }
}

impl RunSummary {
    /// Builds a summary from the crawl outcome and the export report
    pub fn new(outcome: &CrawlOutcome, report: &ExportReport, config_hash: Option<String>) -> Self {
        Self {
            pages_visited: outcome.pages_visited,
            done_reason: outcome.done_reason,
            categories: report
                .written
                .iter()
                .map(|e| (e.category.clone(), e.records))
                .collect(),
            total_records: report.total_records(),
            failed_categories: report.failures.iter().map(|f| f.category.clone()).collect(),
            failed_items: outcome.failures.len(),
            images: ImageCounts::from_log(&outcome.image_log),
            duration_secs: outcome.duration().num_milliseconds() as f64 / 1000.0,
            config_hash,
        }
    }

    /// Returns true if the crawl collected nothing to export
    pub fn is_empty(&self) -> bool {
        self.total_records == 0 && self.failed_categories.is_empty()
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// An empty crawl is reported as such instead of as a successful export.
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Overview:");
    println!(
        "  Listing pages visited: {} ({})",
        summary.pages_visited, summary.done_reason
    );
    println!("  Duration: {:.1}s", summary.duration_secs);
    if let Some(hash) = &summary.config_hash {
        println!("  Config hash: {}", hash);
    }
    println!();

    if summary.is_empty() {
        println!("No data collected: no product records were extracted.");
        if summary.failed_items > 0 {
            println!("  Failed items: {}", summary.failed_items);
        }
        return;
    }

    println!("Categories ({}):", summary.categories.len());
    for (category, count) in &summary.categories {
        println!("  - {}: {} records", category, count);
    }
    println!();

    if !summary.failed_categories.is_empty() {
        println!(
            "Categories Not Written ({}):",
            summary.failed_categories.len()
        );
        for category in &summary.failed_categories {
            println!("  - {}", category);
        }
        println!();
    }

    if summary.images.total() > 0 {
        println!("Images:");
        println!("  Downloaded: {}", summary.images.downloaded);
        println!("  Already on disk: {}", summary.images.cached);
        println!("  Failed: {}", summary.images.failed);
        println!();
    }

    println!(
        "Total: {} records in {} files, {} failed items",
        summary.total_records,
        summary.categories.len(),
        summary.failed_items
    );
}
