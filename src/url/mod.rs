//! URL handling module for Salon-Harvest
//!
//! This module derives canonical salon URLs from raw listing links, the
//! contact page URL of a salon, and search results page URLs.

mod canonical;
mod search;

pub use canonical::{canonical_salon_url, contact_url, salon_id};
pub use search::search_page_url;
