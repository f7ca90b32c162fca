use crate::extract::{element_text, selector};
use crate::record::ListingRecord;
use crate::url::canonical_salon_url;
use crate::ExtractResult;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Selectors used to walk one search results page
struct ListingSelectors {
    row: Selector,
    name: Selector,
    anchor: Selector,
    image_list: Selector,
    salon_link: Selector,
}

impl ListingSelectors {
    fn compile() -> ExtractResult<Self> {
        Ok(Self {
            row: selector(".slnCassetteList > li")?,
            name: selector(".slnName")?,
            anchor: selector("a")?,
            image_list: selector(".slnImgList")?,
            salon_link: selector("a[href*='/slnH']")?,
        })
    }
}

/// Parses the salon listings of one search results page
///
/// # Extraction Rules
///
/// - Each `.slnCassetteList > li` is one listing container
/// - Name: text of the first link inside `.slnName` (so badges next to the
///   link are left out), falling back to the whole `.slnName` text
/// - Link: first link inside the first child of `.slnImgList`, falling back
///   to any link whose target contains a salon identifier
/// - The link is reduced to its canonical URL on `base_url`; containers
///   without a link, without an identifier, or without a name are dropped
/// - A canonical URL already produced by an earlier container on the page
///   is dropped (first occurrence wins)
///
/// # Arguments
///
/// * `html` - The search results page
/// * `base_url` - Site origin canonical URLs are anchored to
/// * `page` - 1-based page number recorded on each listing
///
/// # Example
///
/// ```
/// use salon_harvest::extract::parse_listing_page;
///
/// let html = r#"<ul class="slnCassetteList"><li>
///     <h3 class="slnName"><a href="/slnH000000001/">Salon A</a></h3>
/// </li></ul>"#;
/// let listings = parse_listing_page(html, "https://beauty.hotpepper.jp", 1).unwrap();
/// assert_eq!(listings[0].url, "https://beauty.hotpepper.jp/slnH000000001");
/// ```
pub fn parse_listing_page(
    html: &str,
    base_url: &str,
    page: u32,
) -> ExtractResult<Vec<ListingRecord>> {
    let selectors = ListingSelectors::compile()?;
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut listings = Vec::new();

    for row in document.select(&selectors.row) {
        let Some(href) = listing_href(row, &selectors) else {
            continue;
        };

        let Some(url) = canonical_salon_url(base_url, href) else {
            tracing::trace!("Skipping listing link without salon id: {}", href);
            continue;
        };

        if !seen.insert(url.clone()) {
            tracing::trace!("Skipping duplicate listing {} on page {}", url, page);
            continue;
        }

        let name = listing_name(row, &selectors);
        if name.is_empty() {
            continue;
        }

        listings.push(ListingRecord::new(name, url, page));
    }

    Ok(listings)
}

/// Name from the anchor inside `.slnName`, or the full element text
fn listing_name(row: ElementRef<'_>, selectors: &ListingSelectors) -> String {
    let Some(name_element) = row.select(&selectors.name).next() else {
        return String::new();
    };

    let anchor_text = name_element
        .select(&selectors.anchor)
        .next()
        .map(element_text)
        .unwrap_or_default();

    if anchor_text.is_empty() {
        element_text(name_element)
    } else {
        anchor_text
    }
}

/// Raw detail link of a listing container
fn listing_href<'a>(row: ElementRef<'a>, selectors: &ListingSelectors) -> Option<&'a str> {
    let primary = row
        .select(&selectors.image_list)
        .next()
        .and_then(|list| list.children().find_map(ElementRef::wrap))
        .and_then(|first_child| first_child.select(&selectors.anchor).next())
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.trim().is_empty());

    primary.or_else(|| {
        row.select(&selectors.salon_link)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .filter(|href| !href.trim().is_empty())
    })
}
