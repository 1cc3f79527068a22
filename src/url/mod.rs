//! URL and path handling module for Catalog-Harvest
//!
//! This module provides link resolution against a page URL, filesystem-safe
//! name sanitization, and file extension inference for downloaded assets.

mod extension;
mod resolve;
mod sanitize;

// Re-export main functions
pub use extension::{extension_from_content_type, extension_from_url, DEFAULT_IMAGE_EXTENSION};
pub(crate) use extension::known_image_extensions;
pub use resolve::resolve_link;
pub use sanitize::sanitize_component;
pub(crate) use sanitize::part_path;
