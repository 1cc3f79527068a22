use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Runs of characters that are not safe in a path component
static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("hardcoded regex pattern is valid"));

/// Name used when sanitizing leaves nothing behind
const EMPTY_FALLBACK: &str = "file";

/// Turns an arbitrary label into a filesystem-safe path component
///
/// Every run of characters outside `[A-Za-z0-9_-]` collapses into a single
/// underscore, leading and trailing underscores are stripped, and an empty
/// result becomes `"file"`. Category folders, CSV names and image file stems
/// all go through this function so names stay deterministic across runs.
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::sanitize_component;
///
/// assert_eq!(sanitize_component("Historical Fiction"), "Historical_Fiction");
/// assert_eq!(sanitize_component("Sequential Art / Comics"), "Sequential_Art_Comics");
/// assert_eq!(sanitize_component("???"), "file");
/// ```
pub fn sanitize_component(name: &str) -> String {
    let replaced = UNSAFE_RUN.replace_all(name, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Temporary sibling a file is written to before the final rename
pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut part = dest.as_os_str().to_os_string();
    part.push(".part");
    PathBuf::from(part)
}
