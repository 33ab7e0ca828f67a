//! Output file naming

use chrono::{DateTime, Local};
use url::Url;

/// Maximum length (in characters) of a sanitized name
const MAX_NAME_LEN: usize = 50;

/// Characters that are not allowed in file names on common platforms
const INVALID_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Timestamp layout used in generated file names
const FILENAME_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// Builds a file name for whole-site output
///
/// The name is the seed's host without `www.`, dots replaced by dashes,
/// followed by the local time: `example-com_2024-05-01_10-30-00.md`.
/// Unparseable seeds fall back to `website_<timestamp>.<ext>`.
///
/// # Example
///
/// ```
/// use website_markdown::output::generate_filename;
///
/// let name = generate_filename("https://www.example.com/docs", "json");
/// assert!(name.starts_with("example-com_"));
/// assert!(name.ends_with(".json"));
/// ```
pub fn generate_filename(seed: &str, extension: &str) -> String {
    filename_at(seed, extension, &Local::now())
}

pub(crate) fn filename_at(seed: &str, extension: &str, now: &DateTime<Local>) -> String {
    let timestamp = now.format(FILENAME_TIMESTAMP);

    let host = match Url::parse(seed) {
        Ok(url) => url.host_str().map(|h| h.to_string()),
        Err(_) => None,
    };

    match host {
        Some(host) => {
            let site = host.strip_prefix("www.").unwrap_or(&host).replace('.', "-");
            format!("{}_{}.{}", sanitize_filename(&site), timestamp, extension)
        }
        None => format!("website_{}.{}", timestamp, extension),
    }
}

/// Makes a page title safe to use as a file name
///
/// Replaces path and shell-reserved characters with `-`, truncates to 50
/// characters, collapses repeated dashes and trims dashes from both ends.
/// Returns `untitled` if nothing is left.
pub fn sanitize_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '-' } else { c })
        .take(MAX_NAME_LEN)
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
