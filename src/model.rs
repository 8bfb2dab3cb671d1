//! Core value types shared by every pipeline stage.
//!
//! A PDF exposes only positioned glyph runs. Everything downstream of span
//! extraction works on [`TextFragment`] values plus one document-wide
//! [`FontStatistics`] value, so each stage can be tested without a PDF.

use serde::{Deserialize, Serialize};

/// Font size assumed when the decoder reports none (or a nonsensical one).
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Span style-flag bit marking italic text (MuPDF span-flag convention).
pub const SPAN_FLAG_ITALIC: u32 = 1 << 1;

/// Span style-flag bit marking bold text (MuPDF span-flag convention).
pub const SPAN_FLAG_BOLD: u32 = 1 << 4;

/// Axis-aligned box in page space: origin top-left, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// One contiguous run of text sharing a single font, size and style.
///
/// Created once by the span extractor and never mutated afterwards;
/// [`TextFragment::with_text`] yields a new value when cleaned text is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub font_size: f64,
    /// Lowercased font name.
    pub font_name: String,
    pub is_bold: bool,
    pub is_italic: bool,
    /// 1-based.
    pub page_number: usize,
    pub bbox: BoundingBox,
}

impl TextFragment {
    /// Copy of this fragment carrying different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Document-wide font statistics used by the heading classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontStatistics {
    pub average_font_size: f64,
    pub max_font_size: f64,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            average_font_size: DEFAULT_FONT_SIZE,
            max_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl FontStatistics {
    /// Reduce a fragment sequence to its mean and maximum font size.
    ///
    /// An empty sequence yields the default 12pt / 12pt statistics.
    pub fn from_fragments(fragments: &[TextFragment]) -> Self {
        if fragments.is_empty() {
            return Self::default();
        }
        let (sum, max) = fragments
            .iter()
            .fold((0.0_f64, f64::MIN), |(sum, max), f| {
                (sum + f.font_size, max.max(f.font_size))
            });
        Self {
            average_font_size: sum / fragments.len() as f64,
            max_font_size: max,
        }
    }
}

/// Structural rank of a heading. Only four levels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Numeric depth, 1 through 4.
    pub fn depth(self) -> usize {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// The `#` prefix for this level.
    pub fn marker(self) -> String {
        "#".repeat(self.depth())
    }
}

/// What an [`ImageReference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    /// The M-th (1-based) raster image embedded in the page.
    Embedded(usize),
    /// The full-page rasterisation.
    PageRender,
}

/// A Markdown image link for one extracted asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub page_number: usize,
    pub kind: ImageKind,
    /// POSIX path relative to the Markdown file's directory.
    pub path: String,
}

impl ImageReference {
    pub fn embedded(page_number: usize, index: usize, path: impl Into<String>) -> Self {
        Self {
            page_number,
            kind: ImageKind::Embedded(index),
            path: path.into(),
        }
    }

    pub fn page_render(page_number: usize, path: impl Into<String>) -> Self {
        Self {
            page_number,
            kind: ImageKind::PageRender,
            path: path.into(),
        }
    }

    /// Caption used as the image's alt text.
    pub fn caption(&self) -> String {
        match self.kind {
            ImageKind::Embedded(index) => format!("Figure {}.{}", self.page_number, index),
            ImageKind::PageRender => format!("Page {} rendering", self.page_number),
        }
    }

    /// Ready-to-emit `![caption](path)` snippet.
    pub fn markdown(&self) -> String {
        format!("![{}]({})", self.caption(), self.path)
    }
}
