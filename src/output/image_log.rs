use crate::model::ImageDownload;
use crate::output::atomic::write_csv_atomically;
use crate::output::OutputResult;
use std::path::Path;

/// Column set of the image download log, in output order
pub const IMAGE_LOG_COLUMNS: [&str; 10] = [
    "product_page_url",
    "title",
    "upc",
    "category",
    "image_url",
    "image_path",
    "downloaded",
    "http_status",
    "bytes",
    "error",
];

/// Writes the image download log
///
/// # Returns
///
/// The number of rows written (header excluded)
pub fn write_image_log(entries: &[ImageDownload], path: &Path) -> OutputResult<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    write_csv_atomically(path, |writer| {
        writer.write_record(IMAGE_LOG_COLUMNS)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        Ok(())
    })?;

    tracing::info!("Saved image log: {} ({} rows)", path.display(), entries.len());
    Ok(entries.len())
}
