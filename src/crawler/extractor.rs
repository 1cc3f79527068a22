//! Product page parser
//!
//! Turns one product page into a [`ProductRecord`]. Missing elements degrade
//! to defaults; only a missing attribute table fails the product.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::fields::{clean_text, parse_count_in_parens, strip_currency, text_or_empty};
use crate::model::{ProductRecord, DEFAULT_CATEGORY};
use crate::url::resolve_link;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Description used when the page has no description block
pub const DESCRIPTION_PLACEHOLDER: &str = "Pas de description";

/// Attribute table labels the extractor keeps
const LABEL_UPC: &str = "UPC";
const LABEL_PRICE_INCL: &str = "Price (incl. tax)";
const LABEL_PRICE_EXCL: &str = "Price (excl. tax)";
const LABEL_AVAILABILITY: &str = "Availability";

/// Breadcrumb entries needed before the category can be read
const MIN_BREADCRUMB_LEN: usize = 4;

/// Fetches a product page and extracts its record
pub async fn fetch_product(fetcher: &Fetcher, url: &Url) -> Result<ProductRecord, HarvestError> {
    let html = fetcher.fetch_html(url).await?;
    parse_product(&html, url)
}

/// Parses product page HTML
///
/// # Field Rules
///
/// | Field | Source | Default |
/// |-------|--------|---------|
/// | title | `div.product_main h1`, else first `h1` | empty |
/// | upc, prices, availability | attribute table rows | empty / `0` |
/// | description | first `p` after `#product_description` | placeholder |
/// | category | second-to-last breadcrumb entry (4+ entries) | `Default` |
/// | image_url | `#product_gallery img` src, absolute | empty |
///
/// # Returns
///
/// * `Ok(ProductRecord)` - Record with `image_path` left empty
/// * `Err(HarvestError::MissingAttributeTable)` - The page has no attribute table
pub fn parse_product(html: &str, page_url: &Url) -> Result<ProductRecord, HarvestError> {
    let document = Html::parse_document(html);

    let table = select_first(&document, &["table.table-striped", "table.table"]).ok_or_else(
        || HarvestError::MissingAttributeTable {
            url: page_url.to_string(),
        },
    )?;
    let attributes = AttributeTable::from_table(table);

    Ok(ProductRecord {
        title: text_or_empty(select_first(&document, &["div.product_main h1", "h1"])),
        upc: attributes.upc,
        price_incl_tax: strip_currency(&attributes.price_incl_tax),
        price_excl_tax: strip_currency(&attributes.price_excl_tax),
        availability: parse_count_in_parens(&attributes.availability),
        description: extract_description(&document),
        category: extract_category(&document),
        product_page_url: page_url.to_string(),
        image_url: extract_image_url(&document, page_url),
        image_path: String::new(),
    })
}

/// Raw values of the recognized attribute table rows
#[derive(Debug, Default)]
struct AttributeTable {
    upc: String,
    price_incl_tax: String,
    price_excl_tax: String,
    availability: String,
}

impl AttributeTable {
    /// Scans every label/value row; unknown labels are ignored
    fn from_table(table: ElementRef<'_>) -> Self {
        let mut attributes = Self::default();
        let (Ok(row_sel), Ok(th_sel), Ok(td_sel)) = (
            Selector::parse("tr"),
            Selector::parse("th"),
            Selector::parse("td"),
        ) else {
            return attributes;
        };

        for row in table.select(&row_sel) {
            let (Some(label), Some(value)) =
                (row.select(&th_sel).next(), row.select(&td_sel).next())
            else {
                continue;
            };

            let value = clean_text(value);
            match clean_text(label).as_str() {
                LABEL_UPC => attributes.upc = value,
                LABEL_PRICE_INCL => attributes.price_incl_tax = value,
                LABEL_PRICE_EXCL => attributes.price_excl_tax = value,
                LABEL_AVAILABILITY => attributes.availability = value,
                _ => {}
            }
        }

        attributes
    }
}

/// First element matching any of `selectors`, tried in order
fn select_first<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())
}

fn extract_description(document: &Html) -> String {
    select_first(document, &["#product_description ~ p"])
        .map(clean_text)
        .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string())
}

fn extract_category(document: &Html) -> String {
    let Ok(selector) = Selector::parse("ul.breadcrumb li") else {
        return DEFAULT_CATEGORY.to_string();
    };

    let crumbs: Vec<String> = document.select(&selector).map(clean_text).collect();
    if crumbs.len() < MIN_BREADCRUMB_LEN {
        return DEFAULT_CATEGORY.to_string();
    }

    let category = &crumbs[crumbs.len() - 2];
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.clone()
    }
}

fn extract_image_url(document: &Html, page_url: &Url) -> String {
    select_first(document, &["#product_gallery img[src]"])
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_link(src, page_url))
        .map(|url| url.to_string())
        .unwrap_or_default()
}
