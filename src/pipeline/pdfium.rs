//! pdfium backend: bind the library, open documents, expose pages through
//! the [`PageSource`] seam.
//!
//! pdfium reports page objects in content-stream order with a bottom-left
//! origin. Consecutive text objects are grouped into one text block and
//! coordinates are flipped to the top-left origin the rest of the pipeline
//! expects. pdfium splits text into one object per styled run (often a
//! single word or number), so [`merge_text_runs`] rebuilds lines and
//! joins same-style runs before the layout leaves this module.

use crate::error::Pdf2MdError;
use crate::model::{BoundingBox, SPAN_FLAG_BOLD, SPAN_FLAG_ITALIC};
use crate::output::DocumentMetadata;
use crate::pipeline::source::{EmbeddedImage, LayoutBlock, LayoutLine, PageLayout, PageSource, RawSpan};
use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Runs whose bottom edges differ by less than this fraction of the larger
/// font size sit on the same baseline.
const BASELINE_TOLERANCE: f64 = 0.2;

/// Font sizes closer than this (points) count as the same size.
const SIZE_TOLERANCE: f64 = 0.05;

/// A horizontal gap wider than this fraction of the font size is a word break.
const WORD_GAP_FRACTION: f64 = 0.15;

/// Bind to a pdfium shared library.
///
/// With an explicit directory only that directory is tried; otherwise the
/// working directory first, then the system library search path.
pub fn bind_pdfium(library_dir: Option<&Path>) -> Result<Pdfium, Pdf2MdError> {
    let bindings = match library_dir {
        Some(dir) => {
            let dir = dir.to_string_lossy().into_owned();
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Pdf2MdError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Open a PDF, translating pdfium's load errors into fatal conversion errors.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2MdError> {
    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2MdError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2MdError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2MdError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    info!("PDF loaded: {} pages", document.pages().len());
    Ok(document)
}

/// Read the document information dictionary.
pub fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// One pdfium page behind the [`PageSource`] seam.
pub struct PdfiumPage<'a> {
    page: PdfPage<'a>,
    page_number: usize,
}

impl<'a> PdfiumPage<'a> {
    pub fn new(page: PdfPage<'a>, page_number: usize) -> Self {
        Self { page, page_number }
    }

    fn image_objects(&self) -> impl Iterator<Item = PdfPageObject<'_>> + '_ {
        self.page
            .objects()
            .iter()
            .filter(|object| object.as_image_object().is_some())
    }
}

impl PageSource for PdfiumPage<'_> {
    fn layout(&self) -> Result<PageLayout, Pdf2MdError> {
        let page_height = self.page.height().value as f64;
        let mut layout = PageLayout::default();
        let mut runs: Vec<RawSpan> = Vec::new();

        for object in self.page.objects().iter() {
            if let Some(text) = object.as_text_object() {
                runs.push(text_span(text, page_height));
                continue;
            }

            if !runs.is_empty() {
                layout.blocks.push(LayoutBlock::Text {
                    lines: merge_text_runs(std::mem::take(&mut runs)),
                });
            }

            match object.object_type() {
                PdfPageObjectType::Image => {
                    let bbox = object
                        .bounds()
                        .map(|b| {
                            flip(
                                b.left().value,
                                b.top().value,
                                b.right().value,
                                b.bottom().value,
                                page_height,
                            )
                        })
                        .unwrap_or_default();
                    layout.blocks.push(LayoutBlock::Image { bbox });
                }
                PdfPageObjectType::Path => layout.drawing_count += 1,
                _ => {}
            }
        }

        if !runs.is_empty() {
            layout.blocks.push(LayoutBlock::Text {
                lines: merge_text_runs(runs),
            });
        }

        debug!(
            "Page {}: {} blocks, {} drawings",
            self.page_number,
            layout.blocks.len(),
            layout.drawing_count
        );
        Ok(layout)
    }

    fn image_count(&self) -> usize {
        self.image_objects().count()
    }

    fn extract_image(&self, index: usize) -> Result<EmbeddedImage, String> {
        let object = self
            .image_objects()
            .nth(index)
            .ok_or_else(|| format!("no image object at index {}", index + 1))?;
        let image_object = object
            .as_image_object()
            .ok_or_else(|| "object is not an image".to_string())?;
        let filters: Vec<String> = image_object
            .filters()
            .iter()
            .map(|filter| filter.name().to_string())
            .collect();
        let (format, extension) = native_image_format(&filters);

        // pdfium hands back decoded pixels, not the original stream.
        let image = image_object
            .get_raw_image()
            .map_err(|e| format!("{:?}", e))?;
        let image = match format {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => image,
        };

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(|e| e.to_string())?;

        Ok(EmbeddedImage {
            bytes,
            extension: extension.to_string(),
        })
    }

    fn render(&self, zoom: f32) -> Result<DynamicImage, String> {
        let render_config = PdfRenderConfig::new().scale_page_by_factor(zoom);
        let bitmap = self
            .page
            .render_with_config(&render_config)
            .map_err(|e| format!("{:?}", e))?;
        Ok(bitmap.as_image())
    }
}

fn text_span(text: &PdfPageTextObject<'_>, page_height: f64) -> RawSpan {
    let font = text.font();
    let mut flags = 0;
    if font.is_italic() {
        flags |= SPAN_FLAG_ITALIC;
    }
    if font.is_bold_reenforced() {
        flags |= SPAN_FLAG_BOLD;
    }

    let bbox = text
        .bounds()
        .map(|b| {
            flip(
                b.left().value,
                b.top().value,
                b.right().value,
                b.bottom().value,
                page_height,
            )
        })
        .unwrap_or_default();

    RawSpan {
        text: text.text(),
        size: text.scaled_font_size().value as f64,
        font: font.name(),
        flags,
        bbox,
    }
}

/// Pick the output encoding for an embedded image from its stream filters.
///
/// `DCTDecode` streams were JPEGs in the source file and stay JPEGs; every
/// other filter chain is stored losslessly as PNG.
fn native_image_format(filters: &[String]) -> (ImageFormat, &'static str) {
    if filters.iter().any(|f| f == "DCTDecode" || f == "DCT") {
        (ImageFormat::Jpeg, "jpg")
    } else {
        (ImageFormat::Png, "png")
    }
}

/// Rebuild lines from pdfium's per-object text runs.
///
/// Runs on the same baseline share a line. Within a line, a run that
/// continues rightwards in the same font, size and style is appended to the
/// previous span: text joined (with a space across a word-sized gap) and
/// bounding boxes unioned.
pub(crate) fn merge_text_runs(runs: Vec<RawSpan>) -> Vec<LayoutLine> {
    let mut lines = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();

    for run in runs {
        let prev = current.last();
        let same_line = prev.is_some_and(|p| same_baseline(p, &run));
        let same_run = same_line
            && prev.is_some_and(|p| same_style(p, &run) && run.bbox.left >= p.bbox.left);

        if !same_line && !current.is_empty() {
            lines.push(LayoutLine {
                spans: std::mem::take(&mut current),
            });
        }

        if same_run {
            if let Some(prev) = current.last_mut() {
                append_run(prev, run);
                continue;
            }
        }
        current.push(run);
    }

    if !current.is_empty() {
        lines.push(LayoutLine { spans: current });
    }
    lines
}

fn same_baseline(a: &RawSpan, b: &RawSpan) -> bool {
    (a.bbox.bottom - b.bbox.bottom).abs() <= BASELINE_TOLERANCE * a.size.max(b.size)
}

fn same_style(a: &RawSpan, b: &RawSpan) -> bool {
    a.font == b.font && a.flags == b.flags && (a.size - b.size).abs() <= SIZE_TOLERANCE
}

fn append_run(span: &mut RawSpan, next: RawSpan) {
    let gap = next.bbox.left - span.bbox.right;
    let spaced = span.text.ends_with(char::is_whitespace)
        || next.text.starts_with(char::is_whitespace);
    if gap > span.size * WORD_GAP_FRACTION && !spaced && !span.text.is_empty() {
        span.text.push(' ');
    }
    span.text.push_str(&next.text);
    span.bbox = span.bbox.union(&next.bbox);
}

/// Convert bottom-left-origin PDF coordinates to a top-left-origin box.
fn flip(left: f32, top: f32, right: f32, bottom: f32, page_height: f64) -> BoundingBox {
    BoundingBox::new(
        left as f64,
        page_height - top as f64,
        right as f64,
        page_height - bottom as f64,
    )
}
