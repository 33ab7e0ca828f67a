use url::Url;

/// Extracts the host key used to decide whether a link stays on the crawled site
///
/// The key is the lowercase host, followed by `:port` when the URL names a
/// port other than its scheme's default. Two URLs are on the same site when
/// their keys are equal.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Returns
///
/// * `Some(String)` - The host key
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use website_markdown::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
