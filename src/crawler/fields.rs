//! Lenient field parsers
//!
//! Every helper here has an explicit default and never fails: a value the
//! page does not carry, or carries in an unexpected shape, degrades to that
//! default instead of failing the product.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Currency glyph printed in front of every price
pub const CURRENCY_GLYPH: char = '£';

/// Digits right after the first opening parenthesis
static COUNT_IN_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)").expect("hardcoded regex pattern is valid"));

/// Removes the currency glyph from a price, keeping the number verbatim
///
/// Only the glyph and surrounding whitespace are removed; the numeric text
/// is never rounded or reformatted. An empty input yields an empty string.
///
/// # Examples
///
/// ```
/// use catalog_harvest::crawler::strip_currency;
///
/// assert_eq!(strip_currency("£51.77"), "51.77");
/// assert_eq!(strip_currency("  £0.10 "), "0.10");
/// assert_eq!(strip_currency(""), "");
/// ```
pub fn strip_currency(raw: &str) -> String {
    raw.replace(CURRENCY_GLYPH, "").trim().to_string()
}

/// Extracts the integer that opens the first parenthesised group
///
/// Returns `0` when there is no parenthesised group, when the group does not
/// start with digits, or when the number does not fit a `u32`.
///
/// # Examples
///
/// ```
/// use catalog_harvest::crawler::parse_count_in_parens;
///
/// assert_eq!(parse_count_in_parens("In stock (19 available)"), 19);
/// assert_eq!(parse_count_in_parens("In stock"), 0);
/// assert_eq!(parse_count_in_parens(""), 0);
/// ```
pub fn parse_count_in_parens(raw: &str) -> u32 {
    COUNT_IN_PARENS
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Text content of an element with whitespace runs collapsed and trimmed
pub fn clean_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of an optional element, empty when absent
pub fn text_or_empty(element: Option<ElementRef<'_>>) -> String {
    element.map(clean_text).unwrap_or_default()
}
