//! Content-quality heuristic
//!
//! Decides whether a converted page carries enough real content to be kept.
//! Pages without a title or without enough prose are dropped.

/// Minimum length of the trimmed markdown, in characters
const MIN_CONTENT_CHARS: usize = 200;

/// Minimum number of prose lines
const MIN_CONTENT_LINES: usize = 3;

/// Boilerplate emitted by accessibility skip links
const SKIP_LINK_TEXT: &str = "Skip to main content";

/// Returns true if a page is too thin to keep
///
/// A page is minimal when any of these holds:
/// - the title is empty or equal to the page URL (no real `<title>`)
/// - the trimmed markdown is shorter than 200 characters
/// - fewer than 3 lines remain after discarding empty lines, headings,
///   skip-link boilerplate and lines containing markdown links
pub fn is_minimal(title: &str, markdown: &str, url: &str) -> bool {
    if title == url || title.trim().is_empty() {
        return true;
    }

    if markdown.trim().chars().count() < MIN_CONTENT_CHARS {
        return true;
    }

    count_content_lines(markdown) < MIN_CONTENT_LINES
}

fn count_content_lines(markdown: &str) -> usize {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && !line.contains(SKIP_LINK_TEXT)
                && !line.contains('[')
                && !line.contains("](")
        })
        .count()
}
