//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the document.
//!
//! # Example
//!
//! ```rust
//! use pdf_outline_md::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FragmentCounter {
//!     fragments: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for FragmentCounter {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, fragments: usize, images: usize) {
//!         self.fragments.fetch_add(fragments, Ordering::SeqCst);
//!         eprintln!("Page {}/{}: {} fragments, {} images", page_num, total_pages, fragments, images);
//!     }
//! }
//!
//! let counter = Arc::new(FragmentCounter { fragments: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::AssetError;
use crate::output::ConversionStats;
use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// Implementations must be `Send + Sync`: [`crate::convert`] runs the
/// pipeline on a blocking worker thread. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the document is open, before the first page.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be processed
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text and assets are extracted.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page has been extracted.
    ///
    /// # Arguments
    /// * `page_num` : 1-indexed page number
    /// * `fragments`: text fragments found on the page
    /// * `images`   : image references written for the page (renders included)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, fragments: usize, images: usize) {
        let _ = (page_num, total_pages, fragments, images);
    }

    /// Called for every embedded image or render that could not be written.
    fn on_asset_warning(&self, warning: &AssetError) {
        let _ = warning;
    }

    /// Called once after the Markdown file has been written.
    fn on_conversion_complete(&self, stats: &ConversionStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
