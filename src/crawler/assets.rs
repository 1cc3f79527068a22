//! Product image downloader
//!
//! Images land at `<images_dir>/<Category>/<UPC>.<ext>`. A download is
//! skipped when a non-empty file already exists for the same category and
//! stem, so repeated runs fetch each image at most once.
//!
//! Bytes are streamed into a `.part` file that is renamed into place only
//! after the whole body was written; a failed download leaves no file behind.

use crate::crawler::fetcher::{classify_error, Fetcher};
use crate::model::{ImageDownload, ProductRecord, CACHED_STATUS};
use crate::url::{
    extension_from_content_type, extension_from_url, known_image_extensions, part_path,
    sanitize_component, DEFAULT_IMAGE_EXTENSION,
};
use crate::HarvestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Folder used for products without a category
const UNKNOWN_CATEGORY_DIR: &str = "Unknown";

/// Stem used when a product has neither UPC nor title
const FALLBACK_STEM: &str = "image";

/// Everything needed to place one product image on disk
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub image_url: &'a str,
    pub category: &'a str,
    pub upc: &'a str,
    pub title: &'a str,

    /// Product page the image was found on, sent as `Referer` on retry
    pub referer: &'a str,
}

impl<'a> ImageRequest<'a> {
    pub fn for_record(record: &'a ProductRecord) -> Self {
        Self {
            image_url: &record.image_url,
            category: &record.category,
            upc: &record.upc,
            title: &record.title,
            referer: &record.product_page_url,
        }
    }

    /// Sanitized file stem: UPC, else title, else a fixed fallback
    pub fn file_stem(&self) -> String {
        let source = [self.upc, self.title]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(FALLBACK_STEM);
        sanitize_component(source)
    }

    /// Sanitized category folder name
    pub fn folder_name(&self) -> String {
        if self.category.trim().is_empty() {
            UNKNOWN_CATEGORY_DIR.to_string()
        } else {
            sanitize_component(self.category)
        }
    }

    fn log_entry(&self) -> ImageDownload {
        ImageDownload {
            product_page_url: self.referer.to_string(),
            title: self.title.to_string(),
            upc: self.upc.to_string(),
            category: self.category.to_string(),
            image_url: self.image_url.to_string(),
            ..Default::default()
        }
    }
}

/// Downloads product images into a per-category folder tree
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    fetcher: Fetcher,
    images_dir: PathBuf,
}

impl AssetFetcher {
    pub fn new(fetcher: Fetcher, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Ensures a local copy of the image exists and reports the outcome
    ///
    /// Never fails: every problem is recorded in the returned entry, whose
    /// `image_path` is empty unless the image is on disk.
    ///
    /// # Request Flow
    ///
    /// 1. Empty image URL → nothing to do
    /// 2. Non-empty file already on disk → `http_status = "cached"`, no request
    /// 3. GET without Referer; on a non-success status, one retry with Referer
    /// 4. Reject responses whose Content-Type is not `image/*`
    /// 5. Stream to `<dest>.part`, then rename to `<dest>`
    pub async fn save_image(&self, request: &ImageRequest<'_>) -> ImageDownload {
        let mut entry = request.log_entry();

        if request.image_url.trim().is_empty() {
            return entry;
        }

        let url = match Url::parse(request.image_url) {
            Ok(url) => url,
            Err(e) => {
                entry.error = format!("Invalid image URL: {}", e);
                return entry;
            }
        };

        let folder = self.images_dir.join(request.folder_name());
        let stem = request.file_stem();
        let url_ext = extension_from_url(&url).unwrap_or(DEFAULT_IMAGE_EXTENSION);

        if let Some((path, bytes)) = find_existing(&folder, &stem, url_ext).await {
            tracing::debug!("Image cached: {}", path.display());
            entry.image_path = path.display().to_string();
            entry.downloaded = true;
            entry.http_status = CACHED_STATUS.to_string();
            entry.bytes = bytes;
            return entry;
        }

        match self
            .download(&url, request.referer, &folder, &stem, url_ext, &mut entry)
            .await
        {
            Ok((path, bytes)) => {
                tracing::info!("Image saved: {} ({} bytes)", path.display(), bytes);
                entry.image_path = path.display().to_string();
                entry.downloaded = true;
                entry.bytes = bytes;
            }
            Err(e) => {
                tracing::warn!("Image download failed for {}: {}", url, e);
                entry.error = e.to_string();
            }
        }

        entry
    }

    async fn download(
        &self,
        url: &Url,
        referer: &str,
        folder: &Path,
        stem: &str,
        url_ext: &'static str,
        entry: &mut ImageDownload,
    ) -> Result<(PathBuf, u64), HarvestError> {
        let response = self.fetch_with_referer_retry(url, referer, entry).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(HarvestError::AssetContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        // Content-Type, then a known URL suffix, then the default
        let ext = extension_from_content_type(&content_type).unwrap_or(url_ext);
        let dest = folder.join(format!("{}{}", stem, ext));

        tokio::fs::create_dir_all(folder).await?;
        let bytes = write_atomically(response, url, &dest).await?;

        Ok((dest, bytes))
    }

    /// First attempt without Referer, a single retry with it on an HTTP error
    async fn fetch_with_referer_retry(
        &self,
        url: &Url,
        referer: &str,
        entry: &mut ImageDownload,
    ) -> Result<Response, HarvestError> {
        let first = self.fetcher.send(url, None).await;

        let result = match first {
            Err(e) if e.is_http_status() && !referer.is_empty() => {
                tracing::debug!("Retrying {} with Referer after {}", url, e);
                self.fetcher.send(url, Some(referer)).await
            }
            other => other,
        };

        match &result {
            Ok(response) => entry.http_status = response.status().as_u16().to_string(),
            Err(e) => {
                if let Some(status) = e.status() {
                    entry.http_status = status.to_string();
                }
            }
        }

        result
    }
}

/// Looks for a non-empty file with this stem under any image extension
///
/// The URL-derived extension is tried first since it is what a previous run
/// most likely wrote.
async fn find_existing(
    folder: &Path,
    stem: &str,
    url_ext: &'static str,
) -> Option<(PathBuf, u64)> {
    let candidates = std::iter::once(url_ext)
        .chain(known_image_extensions().into_iter().filter(|ext| *ext != url_ext));

    for ext in candidates {
        let path = folder.join(format!("{}{}", stem, ext));
        if let Ok(metadata) = tokio::fs::metadata(&path).await {
            if metadata.is_file() && metadata.len() > 0 {
                return Some((path, metadata.len()));
            }
        }
    }

    None
}

async fn write_atomically(response: Response, url: &Url, dest: &Path) -> Result<u64, HarvestError> {
    let part = part_path(dest);

    match stream_to_file(response, url, &part).await {
        Ok(bytes) => {
            if let Err(e) = tokio::fs::rename(&part, dest).await {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e.into());
            }
            Ok(bytes)
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&part).await;
            Err(e)
        }
    }
}

async fn stream_to_file(mut response: Response, url: &Url, path: &Path) -> Result<u64, HarvestError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut total = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_error(url.as_str(), e))?
    {
        file.write_all(&chunk).await?;
        total += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(total)
}
