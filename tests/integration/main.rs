//! Integration tests for Catalog-Harvest
//!
//! These tests use wiremock to serve a small catalogue and exercise the
//! crawl, image download, and export paths end-to-end.

mod crawl_tests;
mod export_tests;
