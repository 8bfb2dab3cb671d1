//! The page-source seam between the pipeline and the PDF decoder.
//!
//! Every algorithm downstream works on these plain types, so the pdfium
//! binding lives in exactly one module ([`crate::pipeline::pdfium`]) and the
//! rest of the pipeline can be driven by a scripted source in tests.

use crate::error::Pdf2MdError;
use crate::model::BoundingBox;
use image::DynamicImage;

/// One span as reported by the decoder, before any cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub size: f64,
    pub font: String,
    /// Style-flag bitmask, see [`crate::model::SPAN_FLAG_BOLD`] and
    /// [`crate::model::SPAN_FLAG_ITALIC`].
    pub flags: u32,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutLine {
    pub spans: Vec<RawSpan>,
}

/// A block of page content in decoder order.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBlock {
    Text { lines: Vec<LayoutLine> },
    /// Raster content; handled by the asset extractor, not the span extractor.
    Image { bbox: BoundingBox },
}

/// Structured content of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub blocks: Vec<LayoutBlock>,
    /// Number of vector path objects on the page.
    pub drawing_count: usize,
}

/// Encoded bytes of one embedded image plus the file extension they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// A decoded PDF page.
///
/// Layout failures are fatal; image and render failures are reported as
/// plain detail strings so the caller can downgrade them to warnings.
pub trait PageSource {
    /// Structured text layout (blocks → lines → spans).
    fn layout(&self) -> Result<PageLayout, Pdf2MdError>;

    /// Number of raster images referenced by the page.
    fn image_count(&self) -> usize;

    /// Extract the embedded image at `index` (0-based).
    fn extract_image(&self, index: usize) -> Result<EmbeddedImage, String>;

    /// Rasterise the whole page at the given linear zoom factor.
    fn render(&self, zoom: f32) -> Result<DynamicImage, String>;
}
