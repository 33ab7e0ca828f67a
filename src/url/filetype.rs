use url::Url;

/// Path suffixes of resources that are never converted to markdown
const FILE_EXTENSIONS: &[&str] = &[
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // Archives
    ".zip", ".rar", ".tar", ".gz", ".7z",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg",
    // Video
    ".mp4", ".avi", ".mov", ".wmv", ".flv",
    // Audio
    ".mp3", ".wav", ".flac", ".ogg",
    // Assets and feeds
    ".css", ".js", ".json", ".xml", ".rss",
];

/// Checks if a URL points at a non-document resource
///
/// Only the path is inspected, case-insensitively, so a query string such as
/// `?format=pdf` does not exclude a page.
///
/// # Examples
///
/// ```
/// use website_markdown::url::is_file_link;
///
/// assert!(is_file_link("https://example.com/files/report.PDF"));
/// assert!(!is_file_link("https://example.com/docs/intro"));
/// ```
pub fn is_file_link(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    };

    FILE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
