//! Crawler module for catalogue fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - Listing page parsing (product links and pagination)
//! - Product page extraction into records
//! - Idempotent image downloads
//! - Overall crawl coordination

mod assets;
mod coordinator;
mod extractor;
mod fetcher;
mod fields;
mod lister;

pub use assets::{AssetFetcher, ImageRequest};
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, ItemFailure};
pub use extractor::{fetch_product, parse_product, DESCRIPTION_PLACEHOLDER};
pub use fetcher::{build_http_client, classify_error, Fetcher};
pub use fields::{parse_count_in_parens, strip_currency};
pub use lister::{fetch_listing, parse_listing};
