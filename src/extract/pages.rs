use crate::extract::{element_text, selector};
use crate::ExtractResult;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Pagination text such as `1/34ページ`; ASCII digits only
static PAGE_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)/([0-9]+)ページ").expect("valid page count regex"));

/// Extracts the total number of result pages from a search results page
///
/// Paragraphs are scanned in document order for `<current>/<total>ページ`;
/// the first match decides. Returns 1 when nothing matches or the total is
/// not a positive number.
pub fn parse_total_pages(html: &str) -> ExtractResult<u32> {
    let paragraph = selector("p")?;
    let document = Html::parse_document(html);

    let first_match = document.select(&paragraph).find_map(|p| {
        let text = p.text().collect::<String>();
        PAGE_COUNT_RE
            .captures(&text)
            .map(|caps| caps[2].parse::<u32>().unwrap_or(0))
    });

    Ok(match first_match {
        Some(total) if total > 0 => total,
        _ => 1,
    })
}

/// Extracts the total number of matching salons from a search results page
///
/// Reads the first `span.numberOfResult`, ignoring thousands separators and
/// any trailing unit. Returns 0 when the element or number is missing.
pub fn parse_total_count(html: &str) -> ExtractResult<u64> {
    let count = selector("span.numberOfResult")?;
    let document = Html::parse_document(html);

    let Some(element) = document.select(&count).next() else {
        return Ok(0);
    };

    let digits: String = element_text(element)
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit())
        .collect();

    Ok(digits.parse().unwrap_or(0))
}
