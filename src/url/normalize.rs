use crate::url::CrawlUrl;
use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Resolves a raw href against the page it was found on
///
/// # Rules
///
/// 1. Empty and fragment-only hrefs are skipped
/// 2. Protocol-relative hrefs (`//host/...`) are skipped; share widgets use them
///    to smuggle a foreign target (`//share.site/?u=http://other.com`)
/// 3. Hrefs with a non-HTTP(S) scheme (`mailto:`, `javascript:`, ...) are skipped
/// 4. Absolute hrefs are kept; root-relative and path-relative hrefs are
///    resolved against `base` with standard URL resolution
/// 5. The result is canonicalized (see [`normalize_root`])
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `base` - The URL of the page the href was found on (after redirects)
///
/// # Returns
///
/// * `Ok(CrawlUrl)` - The canonical absolute URL
/// * `Err(UrlError)` - A skip reason (see [`UrlError::is_skip`]) or a malformed href
///
/// # Examples
///
/// ```
/// use keyword_scout::normalize;
/// use url::Url;
///
/// let base = Url::parse("http://ex.com/docs/intro").unwrap();
/// assert_eq!(normalize("/a/", &base).unwrap().as_str(), "http://ex.com/a");
/// assert_eq!(normalize("setup", &base).unwrap().as_str(), "http://ex.com/docs/setup");
/// assert!(normalize("//share.io/?u=http://ex.com/a", &base).is_err());
/// ```
pub fn normalize(href: &str, base: &Url) -> Result<CrawlUrl, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if href.starts_with('#') {
        return Err(UrlError::FragmentOnly(href.to_string()));
    }

    // Browsers treat backslashes like slashes here, and so does `Url::join`
    let mut leading = href.chars().take(2);
    if leading.next().is_some_and(is_slash) && leading.next().is_some_and(is_slash) {
        return Err(UrlError::ProtocolRelative(href.to_string()));
    }

    if let Some(scheme) = scheme_of(href) {
        if !is_web_scheme(&scheme) {
            return Err(UrlError::UnsupportedScheme(scheme));
        }
    }

    let resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    canonicalize(resolved)
}

/// Normalizes a site root given as an absolute URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Lowercase the host (done by the parser for HTTP(S))
/// 4. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse repeated slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters
/// 7. Sort remaining query parameters by key
/// 8. Remove empty query string (trailing ?)
///
/// The scheme is kept as given and `www.` is not stripped, since domain
/// membership is an exact authority comparison.
///
/// # Examples
///
/// ```
/// use keyword_scout::normalize_root;
///
/// let a = normalize_root("http://x.com").unwrap();
/// let b = normalize_root("http://x.com/").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "http://x.com/");
/// ```
pub fn normalize_root(raw: &str) -> Result<CrawlUrl, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
    canonicalize(url)
}

fn canonicalize(mut url: Url) -> Result<CrawlUrl, UrlError> {
    if !is_web_scheme(url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if let Some(query) = url.query() {
        let kept = filter_and_sort_query(query);
        url.set_query(Some(kept.as_str()).filter(|q| !q.is_empty()));
    }

    let display = url.to_string();
    CrawlUrl::from_canonical(url).ok_or(UrlError::MissingHost(display))
}

/// Normalizes a URL path by removing dot segments, empty segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Drops tracking parameters and sorts the rest by key
///
/// Parameters are kept exactly as written (`flag`, `%20`, `+`), so a server
/// sees the same query it would for the original link.
fn filter_and_sort_query(query: &str) -> String {
    let mut params: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty() && !is_tracking_param(param_key(param)))
        .collect();

    // Stable sort keeps repeated keys in their original order
    params.sort_by(|a, b| param_key(a).cmp(param_key(b)));

    params.join("&")
}

fn param_key(param: &str) -> &str {
    param.split_once('=').map_or(param, |(key, _)| key)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

fn is_slash(c: char) -> bool {
    c == '/' || c == '\\'
}

fn is_web_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Returns the lowercased scheme of an href, if it has one
///
/// A scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` followed by `:`.
fn scheme_of(href: &str) -> Option<String> {
    let (candidate, _) = href.split_once(':')?;
    let mut chars = candidate.chars();

    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate.to_ascii_lowercase())
    } else {
        None
    }
}
