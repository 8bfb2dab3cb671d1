//! # pdf-outline-md
//!
//! Convert PDF documents to structured Markdown by reading their typography.
//!
//! ## Why this crate?
//!
//! Plain text extraction loses the outline of a document: headings come out
//! as ordinary lines and paragraphs are split at every visual line break.
//! This crate looks at font size, weight and numbering across the whole
//! document to recover a heading hierarchy, optionally merges body text
//! back into paragraphs ([`ParagraphMode::Paragraphs`]), and keeps the visual content (embedded images plus a render
//! of every page) as files linked from the Markdown.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate path and %PDF magic, place outputs
//!  ├─ 2. Extract   per page: text fragments, embedded images, page render
//!  ├─ 3. Measure   document-wide average and maximum font size
//!  ├─ 4. Classify  heading level per fragment, bullet/whitespace cleanup
//!  └─ 5. Output    <stem>.md + <stem>_assets/, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_outline_md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("report.pdf", &config).await?;
//!     println!("{} headings in {}", output.stats.heading_count, output.markdown_path.display());
//!     for warning in &output.stats.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf-outline-md = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime requirement
//!
//! A pdfium shared library must be loadable at runtime: either in the
//! directory named by [`ConversionConfig::pdfium_library_path`], in the
//! working directory, or on the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageSelection, ParagraphMode};
pub use convert::{convert, convert_pages, convert_sync, inspect, inspect_sync};
pub use error::{AssetError, Pdf2MdError};
pub use model::{FontStatistics, HeadingLevel, ImageKind, ImageReference, TextFragment};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata};
pub use pipeline::input::OutputLayout;
pub use pipeline::source::PageSource;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
