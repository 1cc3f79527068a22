//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the pagination loop that ties the components together:
//! - Fetching listing pages and following the "next" link
//! - Extracting every product on a page, in page order
//! - Downloading product images when enabled
//! - Grouping records by category
//! - Isolating per-product failures from the rest of the crawl

use crate::config::Config;
use crate::crawler::assets::{AssetFetcher, ImageRequest};
use crate::crawler::extractor::fetch_product;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::lister::fetch_listing;
use crate::model::{CategoryGroup, ImageDownload, ListingPage, ProductRecord};
use crate::state::{CrawlState, DoneReason};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// A product that could not be harvested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// The product page URL
    pub url: String,

    /// Error message
    pub error: String,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records grouped by category
    pub groups: CategoryGroup,

    /// One entry per attempted image download (empty when images are disabled)
    pub image_log: Vec<ImageDownload>,

    /// Products skipped because of an error
    pub failures: Vec<ItemFailure>,

    /// Listing pages fetched successfully
    pub pages_visited: u32,

    pub done_reason: DoneReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    pub fn total_records(&self) -> usize {
        self.groups.total_records()
    }

    /// Returns true if the crawl collected no records at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Records accumulated while the crawl is in progress
#[derive(Debug, Default)]
struct Harvest {
    groups: CategoryGroup,
    image_log: Vec<ImageDownload>,
    failures: Vec<ItemFailure>,
    pages_visited: u32,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    start_url: Url,
    fetcher: Fetcher,
    assets: Option<AssetFetcher>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid start URL or HTTP client failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_config(&config.http)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator around an existing fetcher
    ///
    /// Every component issues its requests through `fetcher`, so the HTTP
    /// client is configured in exactly one place.
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self, HarvestError> {
        let start_url = Url::parse(&config.crawler.start_url)?;

        let assets = config
            .output
            .download_images
            .then(|| AssetFetcher::new(fetcher.clone(), &config.output.images_dir));

        Ok(Self {
            config,
            start_url,
            fetcher,
            assets,
        })
    }

    /// Runs the pagination loop until it reaches a terminal state
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The crawl reached `Done`; partial results included
    /// * `Err(HarvestError)` - A listing page failed under the `Abort` policy
    ///
    /// A "next" link pointing back at a listing page already fetched in this
    /// run ends the crawl as if the page had no next link.
    pub async fn run(&self) -> Result<CrawlOutcome, HarvestError> {
        let started_at = Utc::now();
        let mut harvest = Harvest::default();
        let mut state = CrawlState::start(self.start_url.clone());
        let mut visited: HashSet<Url> = HashSet::new();

        tracing::info!(
            "Starting crawl at {} (max pages: {}, images: {})",
            self.start_url,
            self.config
                .crawler
                .max_pages
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string()),
            self.assets.is_some()
        );

        loop {
            tracing::debug!("Crawl state: {}", state.label());

            state = match state {
                CrawlState::AtPage { url, page_number } => {
                    tracing::info!("Listing page {}: {}", page_number, url);
                    visited.insert(url.clone());

                    match fetch_listing(&self.fetcher, &url).await {
                        Ok(listing) => {
                            harvest.pages_visited += 1;
                            self.process_listing(&listing, &mut harvest).await;
                            if listing.is_last() {
                                tracing::debug!("No next page after page {}", page_number);
                            }
                            let next_page = unvisited(listing.next_page, &visited);
                            CrawlState::after_page(
                                page_number,
                                self.config.crawler.max_pages,
                                next_page,
                            )
                        }
                        Err(e) => {
                            tracing::error!("Failed to fetch listing {}: {}", url, e);
                            CrawlState::after_listing_failure(
                                self.config.crawler.on_listing_error,
                                e,
                            )
                        }
                    }
                }

                CrawlState::Done(reason) => {
                    tracing::info!(
                        "Crawl finished ({}): {} pages, {} records, {} failed items",
                        reason,
                        harvest.pages_visited,
                        harvest.groups.total_records(),
                        harvest.failures.len()
                    );

                    return Ok(CrawlOutcome {
                        groups: harvest.groups,
                        image_log: harvest.image_log,
                        failures: harvest.failures,
                        pages_visited: harvest.pages_visited,
                        done_reason: reason,
                        started_at,
                        finished_at: Utc::now(),
                    });
                }

                CrawlState::Aborted(e) => {
                    tracing::error!(
                        "Crawl aborted after {} pages: {}",
                        harvest.pages_visited,
                        e
                    );
                    return Err(e);
                }
            };
        }
    }

    /// Processes every product of a listing page in page order
    async fn process_listing(&self, listing: &ListingPage, harvest: &mut Harvest) {
        let total = listing.product_urls.len();
        tracing::info!("Found {} products", total);

        let delay = Duration::from_millis(self.config.crawler.request_delay);

        for (idx, product_url) in listing.product_urls.iter().enumerate() {
            tracing::info!("  {}/{} {}", idx + 1, total, product_url);

            match self.process_product(product_url).await {
                Ok((record, image)) => {
                    if let Some(entry) = image {
                        harvest.image_log.push(entry);
                    }
                    harvest.groups.insert(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", product_url, e);
                    harvest.failures.push(ItemFailure {
                        url: product_url.to_string(),
                        error: e.to_string(),
                    });
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Extracts one product and downloads its image when enabled
    async fn process_product(
        &self,
        url: &Url,
    ) -> Result<(ProductRecord, Option<ImageDownload>), HarvestError> {
        let mut record = fetch_product(&self.fetcher, url).await?;

        let image = match &self.assets {
            Some(assets) => {
                let entry = assets.save_image(&ImageRequest::for_record(&record)).await;
                record.image_path = entry.image_path.clone();
                Some(entry)
            }
            None => None,
        };

        Ok((record, image))
    }
}

/// Drops a next link that points back at a page already fetched
fn unvisited(next_page: Option<Url>, visited: &HashSet<Url>) -> Option<Url> {
    match next_page {
        Some(next) if visited.contains(&next) => {
            tracing::warn!("Pager loops back to {}, stopping", next);
            None
        }
        other => other,
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::Config;
/// use catalog_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default()).await?;
/// println!("{} records", outcome.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
