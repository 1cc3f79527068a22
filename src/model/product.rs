use serde::Serialize;

/// Column set of every category CSV, in output order
pub const PRODUCT_COLUMNS: [&str; 10] = [
    "title",
    "upc",
    "price_incl_tax",
    "price_excl_tax",
    "availability",
    "description",
    "category",
    "product_page_url",
    "image_url",
    "image_path",
];

/// One product extracted from a product page
///
/// Field order matches [`PRODUCT_COLUMNS`]; the CSV writer relies on it.
/// Text fields default to the empty string when the page does not carry
/// them, and `availability` defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Primary heading of the product page
    pub title: String,

    /// Catalogue identifier from the attribute table
    pub upc: String,

    /// Price including tax, currency glyph removed
    pub price_incl_tax: String,

    /// Price excluding tax, currency glyph removed
    pub price_excl_tax: String,

    /// Units in stock
    pub availability: u32,

    pub description: String,

    pub category: String,

    /// Absolute URL of the product page
    pub product_page_url: String,

    /// Absolute URL of the gallery image, empty when the page has none
    pub image_url: String,

    /// Local path of the downloaded image, empty when not downloaded
    pub image_path: String,
}
