use url::Url;

/// Extension used when neither the response nor the URL names one
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Maps an image `Content-Type` header to a file extension
///
/// Parameters such as `; charset=binary` are ignored and matching is
/// case-insensitive. Returns None for types outside the known image set.
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::extension_from_content_type;
///
/// assert_eq!(extension_from_content_type("image/png"), Some(".png"));
/// assert_eq!(extension_from_content_type("IMAGE/JPEG; q=1"), Some(".jpg"));
/// assert_eq!(extension_from_content_type("text/html"), None);
/// ```
pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/bmp" => Some(".bmp"),
        "image/tiff" => Some(".tif"),
        "image/svg+xml" => Some(".svg"),
        _ => None,
    }
}

/// Extracts a known image extension (with its dot) from a URL's last path segment
///
/// The suffix is lowercased, `.jpeg` is normalized to `.jpg`, and anything
/// outside the known image set (such as `.php` or `.aspx`) yields None.
/// Query strings and fragments are not part of the path and never leak into
/// the extension.
pub fn extension_from_url(url: &Url) -> Option<&'static str> {
    let segment = url.path_segments()?.next_back()?;
    let dot = segment.rfind('.')?;

    if dot == 0 {
        return None;
    }

    let suffix = segment[dot..].to_ascii_lowercase();
    match suffix.as_str() {
        ".jpeg" => Some(".jpg"),
        ".tiff" => Some(".tif"),
        other => known_image_extensions()
            .into_iter()
            .find(|known| *known == other),
    }
}

/// All extensions a downloaded image can end up with, in lookup order
pub(crate) fn known_image_extensions() -> [&'static str; 7] {
    [".jpg", ".png", ".gif", ".webp", ".bmp", ".tif", ".svg"]
}
