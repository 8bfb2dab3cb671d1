//! Result types returned by the conversion entry points.

use crate::error::AssetError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a finished conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The Markdown text that was written to `markdown_path`.
    pub markdown: String,
    pub markdown_path: PathBuf,
    pub assets_dir: PathBuf,
    pub stats: ConversionStats,
}

/// Counters for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages selected and extracted.
    pub processed_pages: usize,
    /// Text fragments extracted across all processed pages.
    pub fragment_count: usize,
    pub heading_count: usize,
    /// Prose units emitted (paragraphs, or lines in line mode).
    pub paragraph_count: usize,
    /// Embedded images written.
    pub image_count: usize,
    /// Full-page renders written.
    pub render_count: usize,
    /// Non-fatal asset failures, in the order they happened.
    pub warnings: Vec<AssetError>,
    pub total_duration_ms: u64,
}

impl ConversionStats {
    /// True when every asset was written.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Document information read without converting any page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}
