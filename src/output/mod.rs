//! Output module for exporting harvest results
//!
//! This module handles:
//! - Rendering full records as CSV rows
//! - Streaming progress events
//! - Summarising job statistics

pub mod csv;
mod events;
pub mod stats;

pub use csv::{to_csv, write_rows, HEADERS};
pub use events::HarvestEvent;
pub use stats::{print_statistics, JobStatistics};

use chrono::{DateTime, TimeZone};

/// Builds the default export file name for a keyword
///
/// Path separators and whitespace in the keyword are replaced so the name
/// stays a single file in the working directory.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use salon_harvest::output::default_export_filename;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(default_export_filename("渋谷", &at), "hotpepper_渋谷_2024-01-15T10-30-00.csv");
/// ```
pub fn default_export_filename<Tz>(keyword: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let safe_keyword: String = keyword
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    format!(
        "hotpepper_{}_{}.csv",
        safe_keyword,
        at.format("%Y-%m-%dT%H-%M-%S")
    )
}
