//! JSON output

use crate::output::naming::generate_filename;
use crate::output::traits::{OutputResult, OutputWriter, WriteReport};
use crate::state::PageRecord;
use std::fs;
use std::path::Path;

/// Writes all pages as one pretty-printed JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn write(
        &self,
        pages: &[PageRecord],
        seed: &str,
        directory: &Path,
    ) -> OutputResult<WriteReport> {
        fs::create_dir_all(directory)?;

        let path = directory.join(generate_filename(seed, "json"));
        let json = serde_json::to_string_pretty(pages)?;
        fs::write(&path, json)?;

        tracing::info!("JSON output saved to {}", path.display());

        Ok(WriteReport {
            path,
            written: pages.len(),
            skipped: 0,
        })
    }
}
