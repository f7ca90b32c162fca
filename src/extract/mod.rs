//! Structured extraction from fetched documents
//!
//! Every function here is pure: it takes the text of one fetched document and
//! returns the fields it can find. A missing element is never an error; it
//! yields an absent field or an empty list. Only a failure of the extraction
//! machinery itself surfaces as an [`ExtractError`].
//!
//! - [`parse_listing_page`]: salon listings on a search results page
//! - [`parse_total_pages`] / [`parse_total_count`]: pagination figures
//! - [`parse_detail_page`]: labeled fields of a salon detail page
//! - [`parse_contact_page`]: the phone number on a salon contact page

mod contact;
mod detail;
mod listing;
mod pages;

pub use contact::{parse_contact_page, PHONE_LABEL};
pub use detail::parse_detail_page;
pub use listing::parse_listing_page;
pub use pages::{parse_total_count, parse_total_pages};

use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Selector};

/// Compiles a CSS selector, mapping failures to [`ExtractError::Selector`]
pub(crate) fn selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Returns the trimmed text content of an element and its descendants
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
