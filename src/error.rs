//! Error types for the pdf-outline-md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2MdError`]: **Fatal**: the conversion cannot proceed at all
//!   (missing input file, corrupt PDF, unwritable output). Returned as
//!   `Err(Pdf2MdError)` from the top-level `convert*` functions.
//!
//! * [`AssetError`]: **Non-fatal**: a single embedded image or a single page
//!   render failed. The conversion continues, the reference is simply absent
//!   from the Markdown, and the error is recorded in
//!   [`crate::output::ConversionStats::warnings`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-outline-md library.
///
/// Asset-level failures use [`AssetError`] and are collected as warnings
/// rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not produce the text layout of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the assets directory next to the Markdown file.
    #[error("Failed to create assets directory '{path}': {source}")]
    AssetDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Place libpdfium next to the binary or in the working directory.\n\
  • Install pdfium system-wide.\n\
  • Set PDFIUM_LIB_PATH=/path/to/dir/containing/libpdfium (or pass --pdfium-lib).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single visual asset.
///
/// The page's text is unaffected; only the failed image or render reference
/// is missing from the output.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum AssetError {
    /// An embedded raster image could not be decoded or written.
    #[error("Could not extract image {image} from page {page}: {detail}")]
    ImageExtractionFailed {
        page: usize,
        image: usize,
        detail: String,
    },

    /// The full-page rasterisation could not be produced or written.
    #[error("Could not render page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },
}

impl AssetError {
    /// 1-based page number the failed asset belongs to.
    pub fn page(&self) -> usize {
        match self {
            AssetError::ImageExtractionFailed { page, .. } | AssetError::RenderFailed { page, .. } => {
                *page
            }
        }
    }
}
