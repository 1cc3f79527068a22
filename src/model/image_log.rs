use serde::Serialize;

/// `http_status` value recorded when an existing file satisfied the request
pub const CACHED_STATUS: &str = "cached";

/// Outcome of one attempted image download
///
/// Field order is the column order of the image log CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageDownload {
    pub product_page_url: String,
    pub title: String,
    pub upc: String,
    pub category: String,
    pub image_url: String,

    /// Local path of the image, empty unless `downloaded` is true
    pub image_path: String,

    pub downloaded: bool,

    /// Numeric status of the last response, `"cached"`, or empty when no
    /// request was made
    pub http_status: String,

    /// Size of the file on disk
    pub bytes: u64,

    /// Failure cause, empty on success
    pub error: String,
}

impl ImageDownload {
    /// Returns true if the image was served from an existing local file
    pub fn is_cached(&self) -> bool {
        self.http_status == CACHED_STATUS
    }
}
