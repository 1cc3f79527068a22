use url::Url;

/// Product links and pagination extracted from one listing page
///
/// Built for each fetched listing page and dropped once the crawler has
/// walked its product links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// The listing page URL
    pub url: Url,

    /// Absolute product page URLs, in page order
    pub product_urls: Vec<Url>,

    /// Absolute URL of the next listing page, if the pager offers one
    pub next_page: Option<Url>,
}

impl ListingPage {
    /// Returns true if this is the last page of the listing
    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}
