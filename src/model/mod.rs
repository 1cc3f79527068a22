//! Data model for harvested catalogue data
//!
//! # Components
//!
//! - `ProductRecord`: one row of output, extracted from a product page
//! - `ListingPage`: product links and pagination found on one listing page
//! - `CategoryGroup`: records grouped by category in discovery order
//! - `ImageDownload`: the outcome of one attempted image download

mod category;
mod image_log;
mod listing;
mod product;

pub use category::{CategoryGroup, DEFAULT_CATEGORY};
pub use image_log::{ImageDownload, CACHED_STATUS};
pub use listing::ListingPage;
pub use product::{ProductRecord, PRODUCT_COLUMNS};
