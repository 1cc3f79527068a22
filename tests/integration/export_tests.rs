//! Crawl followed by export, checked from the files on disk

use crate::support::*;
use catalog_harvest::crawler::run_crawl;
use catalog_harvest::model::PRODUCT_COLUMNS;
use catalog_harvest::output::{
    export_categories, export_categories_reserving, write_image_log, IMAGE_LOG_COLUMNS,
};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_csv(path: &Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

#[tokio::test]
async fn test_export_without_images_keeps_image_path_column() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 3, "Historical Fiction", false).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);
    let csv_dir = PathBuf::from(&config.output.csv_dir);

    let outcome = run_crawl(config).await.unwrap();
    let report = export_categories(&outcome.groups, &csv_dir).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.total_records(), 3);

    let path = csv_dir.join("Historical_Fiction.csv");
    assert_eq!(report.written[0].path, path);

    let (headers, rows) = read_csv(&path);
    assert_eq!(headers, PRODUCT_COLUMNS.to_vec());
    assert!(headers.contains(&"image_path".to_string()));
    assert_eq!(rows.len(), 3);

    let image_path_idx = headers.iter().position(|h| h == "image_path").unwrap();
    for row in &rows {
        assert_eq!(&row[image_path_idx], "");
        assert_eq!(&row[6], "Historical Fiction");
    }
    assert_eq!(&rows[0][1], upc(1, 0));
}

#[tokio::test]
async fn test_export_with_images_writes_log() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 2, "Poetry", false).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/media/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(image_bytes(), "image/jpeg"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), true);
    let csv_dir = PathBuf::from(&config.output.csv_dir);
    let log_path = csv_dir.join(&config.output.image_log);

    let outcome = run_crawl(config).await.unwrap();
    export_categories(&outcome.groups, &csv_dir).unwrap();
    assert_eq!(write_image_log(&outcome.image_log, &log_path).unwrap(), 2);

    let (headers, rows) = read_csv(&csv_dir.join("Poetry.csv"));
    let image_path_idx = headers.iter().position(|h| h == "image_path").unwrap();
    for row in &rows {
        assert!(Path::new(&row[image_path_idx]).is_file());
    }

    let (log_headers, log_rows) = read_csv(&log_path);
    assert_eq!(log_headers, IMAGE_LOG_COLUMNS.to_vec());
    assert_eq!(log_rows.len(), 2);
    assert_eq!(&log_rows[0][6], "true");
    assert_eq!(&log_rows[0][7], "200");
}

#[tokio::test]
async fn test_rerun_replaces_previous_export() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 2, "Travel", false).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), false);
    let csv_dir = PathBuf::from(&config.output.csv_dir);
    std::fs::create_dir_all(&csv_dir).unwrap();
    std::fs::write(csv_dir.join("Travel.csv"), "stale\n").unwrap();

    let outcome = run_crawl(config).await.unwrap();
    export_categories(&outcome.groups, &csv_dir).unwrap();

    let (headers, rows) = read_csv(&csv_dir.join("Travel.csv"));
    assert_eq!(headers.len(), PRODUCT_COLUMNS.len());
    assert_eq!(rows.len(), 2);
    assert!(!csv_dir.join("Travel.csv.part").exists());
}

#[tokio::test]
async fn test_category_named_like_image_log_survives() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, 2, "images downloads", false).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/media/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(image_bytes(), "image/jpeg"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path(), true);
    let csv_dir = PathBuf::from(&config.output.csv_dir);
    let log_name = config.output.image_log.clone();
    let log_path = csv_dir.join(&log_name);

    let outcome = run_crawl(config).await.unwrap();
    let report =
        export_categories_reserving(&outcome.groups, &csv_dir, &[log_name.as_str()]).unwrap();
    write_image_log(&outcome.image_log, &log_path).unwrap();

    let category_path = csv_dir.join("images_downloads_2.csv");
    assert_eq!(report.written[0].path, category_path);

    let (headers, rows) = read_csv(&category_path);
    assert_eq!(headers, PRODUCT_COLUMNS.to_vec());
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][6], "images downloads");

    let (log_headers, log_rows) = read_csv(&log_path);
    assert_eq!(log_headers, IMAGE_LOG_COLUMNS.to_vec());
    assert_eq!(log_rows.len(), 2);
}
