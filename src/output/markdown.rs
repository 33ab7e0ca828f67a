//! Markdown output generation
//!
//! This module writes crawled pages as markdown, either one file per page or
//! a single document covering the whole site.

use crate::output::naming::{generate_filename, sanitize_filename};
use crate::output::traits::{OutputResult, OutputWriter, WriteReport};
use crate::state::PageRecord;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Timestamp layout shown inside generated documents
const DISPLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Writes one markdown file per successfully converted page
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesWriter;

/// Writes every page into one markdown document
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleFileWriter;

impl OutputWriter for FilesWriter {
    fn write(
        &self,
        pages: &[PageRecord],
        _seed: &str,
        directory: &Path,
    ) -> OutputResult<WriteReport> {
        fs::create_dir_all(directory)?;

        let scraped_at = Local::now();
        let mut written = 0;
        let mut skipped = 0;

        for (i, page) in pages.iter().enumerate() {
            if let Some(error) = &page.error {
                tracing::warn!("Skipping {}: {}", page.url, error);
                skipped += 1;
                continue;
            }

            let filename = format!("page-{:03}-{}.md", i + 1, sanitize_filename(&page.title));
            let path = directory.join(&filename);

            if let Err(e) = fs::write(&path, format_page_document(page, &scraped_at)) {
                tracing::warn!("Failed to write {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }

            written += 1;
        }

        tracing::info!("Saved {} files to {}", written, directory.display());
        if skipped > 0 {
            tracing::warn!("{} pages were not written", skipped);
        }

        Ok(WriteReport {
            path: directory.to_path_buf(),
            written,
            skipped,
        })
    }
}

impl OutputWriter for SingleFileWriter {
    fn write(
        &self,
        pages: &[PageRecord],
        seed: &str,
        directory: &Path,
    ) -> OutputResult<WriteReport> {
        fs::create_dir_all(directory)?;

        let path = directory.join(generate_filename(seed, "md"));
        fs::write(&path, format_single_document(pages, seed, &Local::now()))?;

        tracing::info!("Single markdown file saved to {}", path.display());

        let skipped = pages.iter().filter(|p| p.is_error()).count();
        Ok(WriteReport {
            path,
            written: pages.len() - skipped,
            skipped,
        })
    }
}

/// Renders the standalone document for one page
pub fn format_page_document(page: &PageRecord, scraped_at: &DateTime<Local>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", page.title));
    md.push_str(&format!("**URL:** {}  \n", page.url));
    md.push_str(&format!("**Depth:** {}  \n", page.depth));
    md.push_str(&format!(
        "**Scraped:** {}\n\n",
        scraped_at.format(DISPLAY_TIMESTAMP)
    ));
    md.push_str("---\n\n");
    md.push_str(&page.markdown);

    md
}

/// Renders every page of a crawl as one document
///
/// Error records get a short section naming the URL and the failure.
pub fn format_single_document(
    pages: &[PageRecord],
    seed: &str,
    scraped_at: &DateTime<Local>,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Website Content: {}\n\n", seed));
    md.push_str(&format!(
        "*Scraped on {}*\n\n",
        scraped_at.format(DISPLAY_TIMESTAMP)
    ));
    md.push_str("---\n\n");

    for (i, page) in pages.iter().enumerate() {
        match &page.error {
            Some(error) => {
                md.push_str(&format!("## Error: {}\n\n", page.url));
                md.push_str(&format!("**Error:** {}\n\n", error));
            }
            None => {
                md.push_str(&format!("## Page {}: {}\n\n", i + 1, page.title));
                md.push_str(&format!("**URL:** {}  \n", page.url));
                md.push_str(&format!("**Depth:** {}\n\n", page.depth));
                md.push_str("---\n\n");
                md.push_str(&page.markdown);
                md.push_str("\n\n");
            }
        }

        if i + 1 < pages.len() {
            md.push_str("---\n\n");
        }
    }

    md
}
