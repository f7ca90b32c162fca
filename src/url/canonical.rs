use regex::Regex;
use std::sync::LazyLock;

/// Fixed-format salon identifier segment, e.g. `/slnH000123456`
static SALON_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/slnH[0-9]+").expect("valid salon id regex"));

/// Path appended to a salon URL to reach its contact page
const CONTACT_SUFFIX: &str = "/tel/";

/// Extracts the salon identifier segment from a raw link
///
/// Returns the first `/slnH<digits>` segment found anywhere in `href`, which
/// discards query parameters, fragments and trailing path segments.
pub fn salon_id(href: &str) -> Option<&str> {
    SALON_ID_RE.find(href).map(|m| m.as_str())
}

/// Derives the canonical salon URL for a raw listing link
///
/// The canonical form is the site origin followed by exactly the identifier
/// segment. Links without an identifier yield `None`.
///
/// # Examples
///
/// ```
/// use salon_harvest::url::canonical_salon_url;
///
/// let url = canonical_salon_url(
///     "https://beauty.hotpepper.jp",
///     "/slnH000123456/?cstt=1&vos=abc",
/// );
/// assert_eq!(url.as_deref(), Some("https://beauty.hotpepper.jp/slnH000123456"));
/// ```
pub fn canonical_salon_url(base_url: &str, href: &str) -> Option<String> {
    let id = salon_id(href)?;
    Some(format!("{}{}", base_url.trim_end_matches('/'), id))
}

/// Returns the contact page URL for a canonical salon URL
pub fn contact_url(salon_url: &str) -> String {
    format!("{}{}", salon_url.trim_end_matches('/'), CONTACT_SUFFIX)
}
