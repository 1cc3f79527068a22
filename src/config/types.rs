use serde::Deserialize;

/// Listing page the crawl starts from when nothing else is configured
pub const DEFAULT_START_URL: &str =
    "https://books.toscrape.com/catalogue/category/books_1/page-1.html";

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Main configuration structure for Catalog-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// What the crawler does when a listing page cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingFailurePolicy {
    /// Stop paginating and keep the records collected so far
    #[default]
    KeepPartial,

    /// Abandon the crawl and surface the error
    Abort,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First listing page to visit
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of listing pages to visit (unlimited when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Delay after each product fetch (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Behavior when a listing page fetch fails
    #[serde(rename = "on-listing-error")]
    pub on_listing_error: ListingFailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            max_pages: None,
            request_delay: 500,
            on_listing_error: ListingFailurePolicy::default(),
        }
    }
}

/// HTTP client configuration shared by every fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: 20,
            connect_timeout: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one CSV file per category
    #[serde(rename = "csv-dir")]
    pub csv_dir: String,

    /// Directory receiving downloaded images, one subfolder per category
    #[serde(rename = "images-dir")]
    pub images_dir: String,

    /// Whether product images are downloaded
    #[serde(rename = "download-images")]
    pub download_images: bool,

    /// File name of the image download log, written inside `csv-dir`
    #[serde(rename = "image-log")]
    pub image_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: "books_csv".to_string(),
            images_dir: "books_images".to_string(),
            download_images: true,
            image_log: "images_downloads.csv".to_string(),
        }
    }
}
