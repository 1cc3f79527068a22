//! Pagination, extraction, and failure handling through the coordinator

use crate::support::*;
use catalog_harvest::config::ListingFailurePolicy;
use catalog_harvest::crawler::Coordinator;
use catalog_harvest::state::DoneReason;
use catalog_harvest::HarvestError;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_page_crawl_collects_every_product() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 20, "Poetry", true).await;
    mount_listing_page(&server, 2, 4, "Poetry", false).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.total_records(), 24);
    assert_eq!(outcome.done_reason, DoneReason::LastPage);
    assert!(outcome.failures.is_empty());
    assert!(outcome.image_log.is_empty());

    let poetry = outcome.groups.get("Poetry").expect("Poetry group missing");
    assert_eq!(poetry.len(), 24);

    // Page order is preserved within the category
    assert_eq!(poetry[0].upc, upc(1, 0));
    assert_eq!(poetry[19].upc, upc(1, 19));
    assert_eq!(poetry[20].upc, upc(2, 0));

    let first = &poetry[0];
    assert_eq!(first.title, "Book 1 0");
    assert_eq!(first.price_incl_tax, "51.77");
    assert_eq!(first.price_excl_tax, "50.00");
    assert_eq!(first.availability, 7);
    assert_eq!(first.description, "About Book 1 0.");
    assert_eq!(
        first.product_page_url,
        format!("{}{}", server.uri(), product_path(&slug(1, 0)))
    );
    assert_eq!(
        first.image_url,
        format!("{}/media/{}.jpg", server.uri(), slug(1, 0))
    );
    assert!(first.image_path.is_empty());
}

#[tokio::test]
async fn test_page_budget_stops_after_first_page() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 20, "Poetry", true).await;

    Mock::given(method("GET"))
        .and(path(listing_path(2)))
        .respond_with(html_response(listing_html(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, dir.path(), false);
    config.crawler.max_pages = Some(1);

    let coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(outcome.total_records(), 20);
    assert_eq!(outcome.done_reason, DoneReason::PageBudget);
}

#[tokio::test]
async fn test_listing_failure_keeps_partial_results() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 3, "Travel", true).await;

    Mock::given(method("GET"))
        .and(path(listing_path(2)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await.expect("Partial results expected");

    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(outcome.total_records(), 3);
    assert_eq!(outcome.done_reason, DoneReason::ListingFailed);
}

#[tokio::test]
async fn test_listing_failure_aborts_under_abort_policy() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 3, "Travel", true).await;

    Mock::given(method("GET"))
        .and(path(listing_path(2)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, dir.path(), false);
    config.crawler.on_listing_error = ListingFailurePolicy::Abort;

    let coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_first_listing_unreachable_is_empty_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(listing_path(1)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.pages_visited, 0);
    assert_eq!(outcome.done_reason, DoneReason::ListingFailed);
}

#[tokio::test]
async fn test_failing_products_are_skipped() {
    let server = MockServer::start().await;

    let slugs = vec![
        "good_1".to_string(),
        "missing_2".to_string(),
        "no-table_3".to_string(),
        "good_4".to_string(),
    ];
    mount_html(&server, &listing_path(1), listing_html(&slugs, None)).await;
    mount_html(
        &server,
        &product_path("good_1"),
        product_html("Good One", "g1", "Travel", None),
    )
    .await;
    mount_html(
        &server,
        &product_path("good_4"),
        product_html("Good Four", "g4", "Travel", None),
    )
    .await;
    mount_html(
        &server,
        &product_path("no-table_3"),
        "<html><body><h1>Not a product</h1></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(product_path("missing_2")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(outcome.total_records(), 2);
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.failures[0].url.ends_with(&product_path("missing_2")));
    assert!(outcome.failures[0].error.contains("404"));
    assert!(outcome.failures[1].url.ends_with(&product_path("no-table_3")));

    let travel = outcome.groups.get("Travel").unwrap();
    let upcs: Vec<&str> = travel.iter().map(|r| r.upc.as_str()).collect();
    assert_eq!(upcs, vec!["g1", "g4"]);
    assert!(travel[0].image_url.is_empty());
}

#[tokio::test]
async fn test_records_grouped_by_category_in_discovery_order() {
    let server = MockServer::start().await;

    let slugs = vec![
        "a_1".to_string(),
        "b_2".to_string(),
        "c_3".to_string(),
    ];
    mount_html(&server, &listing_path(1), listing_html(&slugs, None)).await;
    mount_html(&server, &product_path("a_1"), product_html("A", "u1", "Mystery", None)).await;
    mount_html(&server, &product_path("b_2"), product_html("B", "u2", "Poetry", None)).await;
    mount_html(&server, &product_path("c_3"), product_html("C", "u3", "Mystery", None)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    let categories: Vec<&str> = outcome.groups.categories().collect();
    assert_eq!(categories, vec!["Mystery", "Poetry"]);
    assert_eq!(outcome.groups.get("Mystery").unwrap().len(), 2);
    assert_eq!(outcome.groups.get("Poetry").unwrap().len(), 1);
}

#[tokio::test]
async fn test_crawl_with_images_fills_image_path() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 2, "Poetry", false).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/media/.*\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(image_bytes(), "image/jpeg"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), true);

    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(outcome.image_log.len(), 2);
    for entry in &outcome.image_log {
        assert!(entry.downloaded);
        assert_eq!(entry.http_status, "200");
        assert_eq!(entry.bytes, image_bytes().len() as u64);
    }

    let poetry = outcome.groups.get("Poetry").unwrap();
    let expected = dir
        .path()
        .join("books_images")
        .join("Poetry")
        .join(format!("{}.jpg", upc(1, 0)));
    assert_eq!(poetry[0].image_path, expected.display().to_string());
    assert_eq!(std::fs::read(&expected).unwrap(), image_bytes());
}

#[tokio::test]
async fn test_pager_pointing_at_itself_stops_crawl() {
    let server = MockServer::start().await;

    let slugs = vec!["loop_1".to_string()];
    Mock::given(method("GET"))
        .and(path(listing_path(1)))
        .respond_with(html_response(listing_html(&slugs, Some("page-1.html"))))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, &product_path("loop_1"), product_html("Loop", "l1", "Travel", None)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);

    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(outcome.total_records(), 1);
    assert_eq!(outcome.done_reason, DoneReason::LastPage);
}

#[tokio::test]
async fn test_request_delay_spaces_out_products() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 3, "Poetry", false).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, dir.path(), false);
    config.crawler.request_delay = 150;

    let started = Instant::now();
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.total_records(), 3);
    // One pause after each of the three products
    assert!(
        elapsed >= Duration::from_millis(450),
        "crawl took only {:?}",
        elapsed
    );
}
