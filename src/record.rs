//! Record types produced by the harvest pipeline
//!
//! A [`ListingRecord`] is created once while parsing a search results page.
//! Enrichment merges it with the [`DetailFields`] of its detail page and the
//! phone number from its contact page into a [`FullRecord`], the terminal unit
//! of output.

use serde::{Deserialize, Serialize};

/// Summary of one salon as it appears on a search results page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Display name (never empty)
    pub name: String,

    /// Absolute, query-stripped salon URL; unique within one job
    pub url: String,

    /// 1-based search results page the listing was found on
    pub page: u32,
}

impl ListingRecord {
    /// Creates a listing record
    pub fn new(name: impl Into<String>, url: impl Into<String>, page: u32) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            page,
        }
    }
}

/// Optional attributes read from a salon's detail page
///
/// Every field is independently optional; absence is a valid terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFields {
    /// Phone number as shown on the detail page (usually masked)
    pub tel_mask: Option<String>,
    pub address: Option<String>,
    /// Access and directions
    pub access: Option<String>,
    pub business_hours: Option<String>,
    pub holiday: Option<String>,
    /// Accepted payment methods
    pub payment: Option<String>,
    pub cut_price: Option<String>,
    pub staff_count: Option<String>,
    /// Feature tags
    pub features: Option<String>,
    pub remarks: Option<String>,
    pub others: Option<String>,
}

impl DetailFields {
    /// Returns true if no field was extracted
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A listing merged with its detail fields and resolved phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRecord {
    #[serde(flatten)]
    pub listing: ListingRecord,

    #[serde(flatten)]
    pub detail: DetailFields,

    /// Phone number read from the contact page
    pub tel_real: Option<String>,
}

impl FullRecord {
    /// Merges the results of both enrichment fetches
    pub fn merge(listing: ListingRecord, detail: DetailFields, tel_real: Option<String>) -> Self {
        Self {
            listing,
            detail,
            tel_real,
        }
    }

    /// A degraded record carrying only the listing's own fields
    pub fn bare(listing: ListingRecord) -> Self {
        Self::merge(listing, DetailFields::default(), None)
    }

    /// Returns true if enrichment contributed nothing to this record
    pub fn is_degraded(&self) -> bool {
        self.detail.is_empty() && self.tel_real.is_none()
    }
}
