use crate::extract::{element_text, selector};
use crate::ExtractResult;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Table label of the phone number row
pub const PHONE_LABEL: &str = "電話番号";

/// Phone-number-shaped token, e.g. `03-1234-5678` or `0120 123 456`
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"0[0-9]{1,4}[-\s]?[0-9]{1,4}[-\s]?[0-9]{3,4}").expect("valid phone regex")
});

/// One way of finding the phone number; `None` means "no signal"
type Strategy = fn(&Html) -> ExtractResult<Option<String>>;

/// Strategies in priority order
const STRATEGIES: [(&str, Strategy); 4] = [
    ("labeled table", from_labeled_table),
    ("labeled cell", from_labeled_cell),
    ("tel link", from_tel_link),
    ("text pattern", from_text_pattern),
];

/// Resolves the phone number shown on a salon contact page
///
/// Tries, in order, until one yields a non-empty value:
///
/// 1. the last `電話番号` row of the contact table
/// 2. the last `電話番号` label cell paired with its immediately following `td`
/// 3. the first `tel:` link
/// 4. the first phone-number-shaped token in any element's own text
///
/// # Example
///
/// ```
/// use salon_harvest::extract::parse_contact_page;
///
/// let html = r#"<p>お電話: <a href="tel:0312345678">call</a></p>"#;
/// assert_eq!(parse_contact_page(html).unwrap().as_deref(), Some("0312345678"));
/// ```
pub fn parse_contact_page(html: &str) -> ExtractResult<Option<String>> {
    let document = Html::parse_document(html);

    for (name, strategy) in STRATEGIES {
        if let Some(phone) = strategy(&document)? {
            tracing::trace!("Phone resolved by {} strategy", name);
            return Ok(Some(phone));
        }
    }

    Ok(None)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Strategy 1: the dedicated contact table; a later phone row overrides an
/// earlier one
fn from_labeled_table(document: &Html) -> ExtractResult<Option<String>> {
    let rows = selector("table.wFull.bdCell.pCell10.mT15 tr")?;
    let label = selector("th")?;
    let value = selector("td")?;

    let phone = document
        .select(&rows)
        .filter(|row| row.select(&label).map(element_text).collect::<String>() == PHONE_LABEL)
        .filter_map(|row| non_empty(row.select(&value).map(element_text).collect()))
        .last();

    Ok(phone)
}

/// Strategy 2: any label cell followed directly by its value cell; the last
/// non-empty pair wins
fn from_labeled_cell(document: &Html) -> ExtractResult<Option<String>> {
    let label = selector("th")?;

    let phone = document
        .select(&label)
        .filter(|th| element_text(*th) == PHONE_LABEL)
        .filter_map(|th| th.next_siblings().find_map(ElementRef::wrap))
        .filter(|sibling| sibling.value().name() == "td")
        .filter_map(|td| non_empty(element_text(td)))
        .last();

    Ok(phone)
}

/// Strategy 3: the first `tel:` link
fn from_tel_link(document: &Html) -> ExtractResult<Option<String>> {
    let tel_link = selector("a[href^='tel:']")?;

    let phone = document
        .select(&tel_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| href.strip_prefix("tel:"))
        .map(|number| number.trim().to_string())
        .and_then(non_empty);

    Ok(phone)
}

/// Strategy 4: scan each element's own text for a phone-shaped token
fn from_text_pattern(document: &Html) -> ExtractResult<Option<String>> {
    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if matches!(element.value().name(), "script" | "style") {
            continue;
        }

        let own_text: String = element
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|text| &**text)
            .collect();

        if let Some(found) = PHONE_RE.find(own_text.trim()) {
            return Ok(Some(found.as_str().to_string()));
        }
    }

    Ok(None)
}
