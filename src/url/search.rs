use crate::config::SiteConfig;
use url::Url;

/// Builds the URL of one salon search results page
///
/// The keyword is percent-encoded; the fixed filters mirror the site's own
/// "popular, all genders" search form.
///
/// # Examples
///
/// ```
/// use salon_harvest::config::SiteConfig;
/// use salon_harvest::url::search_page_url;
///
/// let url = search_page_url(&SiteConfig::default(), "渋谷", 2).unwrap();
/// assert!(url.as_str().starts_with("https://beauty.hotpepper.jp/CSP/bt/salonSearch/search/?freeword="));
/// assert!(url.as_str().contains("pn=2"));
/// ```
pub fn search_page_url(site: &SiteConfig, keyword: &str, page: u32) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&site.base_url)?.join(&site.search_path)?;

    url.query_pairs_mut()
        .append_pair("freeword", keyword)
        .append_pair("pn", &page.to_string())
        .append_pair("searchGender", "ALL")
        .append_pair("sortType", "popular")
        .append_pair("fromSearchCondition", "true")
        .append_pair("searchT", "検索");

    Ok(url)
}
