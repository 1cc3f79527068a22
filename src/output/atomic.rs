use crate::output::{OutputError, OutputResult};
use crate::url::part_path;
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// Writes a CSV file all-or-nothing
///
/// Rows go to `<path>.part`; the file is synced and renamed over `path` only
/// when `fill` succeeded. On any failure the `.part` file is removed and
/// `path` is left untouched. Headers are the caller's job, which lets an
/// empty table still carry its header row.
pub(crate) fn write_csv_atomically<F>(path: &Path, fill: F) -> OutputResult<()>
where
    F: FnOnce(&mut Writer<File>) -> OutputResult<()>,
{
    let part = part_path(path);

    let result = write_part(&part, fill).and_then(|()| {
        std::fs::rename(&part, path)?;
        Ok(())
    });

    if result.is_err() {
        let _ = std::fs::remove_file(&part);
    }

    result
}

fn write_part<F>(part: &Path, fill: F) -> OutputResult<()>
where
    F: FnOnce(&mut Writer<File>) -> OutputResult<()>,
{
    let file = File::create(part)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    fill(&mut writer)?;

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;
    file.sync_all()?;

    Ok(())
}
