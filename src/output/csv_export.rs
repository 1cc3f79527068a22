//! Per-category CSV export
//!
//! Each category becomes `<csv_dir>/<Category>.csv` with the fixed product
//! column set. One category failing to write does not stop the others.

use crate::model::{CategoryGroup, ProductRecord, PRODUCT_COLUMNS};
use crate::output::atomic::write_csv_atomically;
use crate::output::OutputResult;
use crate::url::sanitize_component;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A category file that was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryExport {
    pub category: String,
    pub path: PathBuf,
    pub records: usize,
}

/// A category file that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub category: String,
    pub path: PathBuf,
    pub error: String,
}

/// Result of exporting a whole [`CategoryGroup`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Files written, in category discovery order
    pub written: Vec<CategoryExport>,

    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn categories_written(&self) -> usize {
        self.written.len()
    }

    /// Records written across all category files
    pub fn total_records(&self) -> usize {
        self.written.iter().map(|e| e.records).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes one CSV file per category
///
/// # Arguments
///
/// * `groups` - Records grouped by category
/// * `csv_dir` - Output directory, created if missing
///
/// # Returns
///
/// * `Ok(ExportReport)` - Per-category outcome; individual failures are listed
///   in `failures` rather than returned as an error
/// * `Err(OutputError)` - The output directory could not be created
pub fn export_categories(groups: &CategoryGroup, csv_dir: &Path) -> OutputResult<ExportReport> {
    export_categories_reserving(groups, csv_dir, &[])
}

/// Like [`export_categories`], but never writes over the `reserved` file names
///
/// Names are compared case-insensitively. A category that would land on a
/// reserved name gets the next free `_2`, `_3` suffix instead.
pub fn export_categories_reserving(
    groups: &CategoryGroup,
    csv_dir: &Path,
    reserved: &[&str],
) -> OutputResult<ExportReport> {
    std::fs::create_dir_all(csv_dir)?;

    let mut used_names: HashSet<String> = reserved.iter().map(|name| reserved_stem(name)).collect();

    let mut report = ExportReport::default();
    let mut used_names = HashSet::new();

    for (category, records) in groups.iter() {
        let file_name = unique_file_name(category, &mut used_names);
        let path = csv_dir.join(file_name);

        match write_records(&path, records) {
            Ok(()) => {
                tracing::info!("Saved {} rows to: {}", records.len(), path.display());
                report.written.push(CategoryExport {
                    category: category.to_string(),
                    path,
                    records: records.len(),
                });
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", path.display(), e);
                report.failures.push(ExportFailure {
                    category: category.to_string(),
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Writes records to a single CSV file with the fixed column set
///
/// The header row is always present, even for an empty slice.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> OutputResult<()> {
    write_csv_atomically(path, |writer| {
        writer.write_record(PRODUCT_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        Ok(())
    })
}

/// Lowercase stem a reserved file name occupies
fn reserved_stem(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.strip_suffix(".csv") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// File name for a category, suffixed when two categories sanitize alike
fn unique_file_name(category: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_component(category);
    let mut stem = base.clone();
    let mut n = 2;

    while !used.insert(stem.to_ascii_lowercase()) {
        stem = format!("{}_{}", base, n);
        n += 1;
    }

    format!("{}.csv", stem)
}
