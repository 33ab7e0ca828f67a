use url::form_urlencoded;
use url::Url;

/// Query parameters that only carry tracking information
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "ref",
    "source",
    "from",
    "_ga",
    "_gl",
    "mc_cid",
    "mc_eid",
];

/// Normalizes a URL into the key used for deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; if it cannot be parsed, return it unchanged
/// 2. Lowercase the scheme and host
/// 3. Remove the fragment
/// 4. Remove the trailing slash from the path (except for root /)
/// 5. Remove tracking query parameters
/// 6. Re-encode the remaining parameters sorted by key
/// 7. Drop the query string when no parameters remain
///
/// Normalization is best-effort and idempotent: normalizing an already
/// normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use website_markdown::url::normalize_url;
///
/// assert_eq!(normalize_url("http://EX.com/a#frag"), "http://ex.com/a");
/// assert_eq!(
///     normalize_url("http://x.com/p?utm_source=a&keep=1"),
///     "http://x.com/p?keep=1"
/// );
/// ```
pub fn normalize_url(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };

    // The parser already lowercases the scheme and the host of http(s) URLs;
    // hosts of other schemes are kept verbatim, so fold them here.
    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host && url.set_host(Some(&lowered)).is_err() {
            return url.to_string();
        }
    }

    url.set_fragment(None);

    if !url.cannot_be_a_base() {
        let path = url.path().to_string();
        if path != "/" && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            url.set_path(if trimmed.is_empty() { "/" } else { trimmed });
        }
    }

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            url.set_query(Some(&query));
        }
    }

    url.to_string()
}

/// Filters out tracking parameters and sorts the rest by key
///
/// The sort is stable, so repeated keys keep their relative order.
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key)
}
