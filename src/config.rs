//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Heading and paragraph thresholds are
//! not configurable here; they are named constants in
//! [`crate::pipeline::heading`] and [`crate::pipeline::paragraph`].

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Linear zoom used for full-page renders (2× linear, 4× area).
pub const DEFAULT_RENDER_ZOOM: f32 = 2.0;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_outline_md::{ConversionConfig, ParagraphMode};
///
/// let config = ConversionConfig::builder()
///     .render_zoom(3.0)
///     .paragraph_mode(ParagraphMode::Paragraphs)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Linear zoom factor for full-page renders. Range: 0.5–8.0. Default: 2.0.
    pub render_zoom: f32,

    /// Write embedded raster images to the assets directory. Default: true.
    pub extract_images: bool,

    /// Write one full-page PNG render per page. Default: true.
    ///
    /// The render is a visual fallback for content the text layer cannot
    /// express (vector charts, tables, formulae).
    pub render_pages: bool,

    /// How prose fragments are laid out. Default: [`ParagraphMode::Lines`].
    pub paragraph_mode: ParagraphMode,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Markdown output path. Default: `<input-stem>.md` next to the input.
    ///
    /// The assets directory is always created beside the Markdown file.
    pub output_path: Option<PathBuf>,

    /// Directory containing the pdfium shared library.
    ///
    /// When unset, the working directory and then the system library search
    /// path are tried.
    pub pdfium_library_path: Option<PathBuf>,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            render_zoom: DEFAULT_RENDER_ZOOM,
            extract_images: true,
            render_pages: true,
            paragraph_mode: ParagraphMode::default(),
            pages: PageSelection::default(),
            password: None,
            output_path: None,
            pdfium_library_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("render_zoom", &self.render_zoom)
            .field("extract_images", &self.extract_images)
            .field("render_pages", &self.render_pages)
            .field("paragraph_mode", &self.paragraph_mode)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("output_path", &self.output_path)
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn render_zoom(mut self, zoom: f32) -> Self {
        self.config.render_zoom = zoom;
        self
    }

    pub fn extract_images(mut self, v: bool) -> Self {
        self.config.extract_images = v;
        self
    }

    pub fn render_pages(mut self, v: bool) -> Self {
        self.config.render_pages = v;
        self
    }

    pub fn paragraph_mode(mut self, mode: ParagraphMode) -> Self {
        self.config.paragraph_mode = mode;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = Some(path.into());
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2MdError> {
        let c = &self.config;
        if !c.render_zoom.is_finite() || !(0.5..=8.0).contains(&c.render_zoom) {
            return Err(Pdf2MdError::InvalidConfig(format!(
                "Render zoom must be 0.5–8.0, got {}",
                c.render_zoom
            )));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(Pdf2MdError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}: pages are 1-indexed and start must be <= end"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How non-heading fragments are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParagraphMode {
    /// One line per fragment, exactly as extracted. (default)
    #[default]
    Lines,
    /// Merge prose runs into paragraphs, one per line, blank line after each.
    Paragraphs,
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
