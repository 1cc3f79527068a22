//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: where the pagination loop is (at a page, done, or aborted)
//! - `DoneReason`: why a crawl finished normally

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, DoneReason};
