//! Listing page parser
//!
//! A listing page enumerates product cards and carries a pager whose "next"
//! item links to the following listing page. The last page simply has no
//! "next" item.

use crate::crawler::fetcher::Fetcher;
use crate::model::ListingPage;
use crate::url::resolve_link;
use crate::HarvestError;
use scraper::{Html, Selector};
use url::Url;

/// Product links inside product cards
const PRODUCT_LINK_SELECTOR: &str = "article.product_pod h3 a[href]";

/// "Next" affordance of the pager, most specific first
const NEXT_PAGE_SELECTORS: [&str; 2] = ["ul.pager li.next a[href]", "li.next a[href]"];

/// Fetches a listing page and extracts its product links and next page
///
/// Transport and HTTP status failures propagate; the caller decides whether
/// they end the crawl.
pub async fn fetch_listing(fetcher: &Fetcher, url: &Url) -> Result<ListingPage, HarvestError> {
    let html = fetcher.fetch_html(url).await?;
    Ok(parse_listing(&html, url))
}

/// Parses listing page HTML
///
/// Relative links are resolved against `page_url`. A missing or malformed
/// pager yields `next_page: None`.
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        url: page_url.clone(),
        product_urls: extract_product_urls(&document, page_url),
        next_page: extract_next_page(&document, page_url),
    }
}

fn extract_product_urls(document: &Html, page_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse(PRODUCT_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect()
}

fn extract_next_page(document: &Html, page_url: &Url) -> Option<Url> {
    NEXT_PAGE_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_link(href, page_url))
        })
}
