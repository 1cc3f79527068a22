//! Crawl state definitions for the pagination loop
//!
//! The crawler is always at one listing page or finished. Transitions are
//! pure functions here so the coordinator only performs I/O.

use crate::config::ListingFailurePolicy;
use crate::HarvestError;
use std::fmt;
use url::Url;

/// Why a crawl reached `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The last listing page had no "next" link
    LastPage,

    /// The configured page budget was used up
    PageBudget,

    /// A listing page failed and the policy keeps partial results
    ListingFailed,
}

impl DoneReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastPage => "last_page",
            Self::PageBudget => "page_budget",
            Self::ListingFailed => "listing_failed",
        }
    }
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents where the crawl currently is
#[derive(Debug)]
pub enum CrawlState {
    /// About to fetch a listing page (`page_number` is 1-based)
    AtPage { url: Url, page_number: u32 },

    // ===== Terminal States =====
    /// Finished normally; accumulated records are kept
    Done(DoneReason),

    /// A listing fetch failed under the `Abort` policy
    Aborted(HarvestError),
}

impl CrawlState {
    /// Initial state for a crawl starting at `url`
    pub fn start(url: Url) -> Self {
        Self::AtPage {
            url,
            page_number: 1,
        }
    }

    /// Returns true if no further pages will be fetched
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::AtPage { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AtPage { .. } => "at_page",
            Self::Done(_) => "done",
            Self::Aborted(_) => "aborted",
        }
    }

    /// Transition after every product on page `page_number` was processed
    ///
    /// The page budget is checked before the next link, so a budget stops the
    /// crawl even when the page advertises a next page.
    pub fn after_page(page_number: u32, max_pages: Option<u32>, next_page: Option<Url>) -> Self {
        if let Some(budget) = max_pages {
            if page_number >= budget {
                return Self::Done(DoneReason::PageBudget);
            }
        }

        match next_page {
            Some(url) => Self::AtPage {
                url,
                page_number: page_number + 1,
            },
            None => Self::Done(DoneReason::LastPage),
        }
    }

    /// Transition after a listing page could not be fetched
    pub fn after_listing_failure(policy: ListingFailurePolicy, error: HarvestError) -> Self {
        match policy {
            ListingFailurePolicy::KeepPartial => Self::Done(DoneReason::ListingFailed),
            ListingFailurePolicy::Abort => Self::Aborted(error),
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtPage { url, page_number } => write!(f, "at_page({}, {})", page_number, url),
            Self::Done(reason) => write!(f, "done({})", reason),
            Self::Aborted(error) => write!(f, "aborted({})", error),
        }
    }
}
