//! Conversion entry points.
//!
//! [`convert_sync`] does the work on the calling thread; [`convert`] moves it
//! onto tokio's blocking pool because pdfium is CPU-bound and not
//! async-safe. Both go through [`convert_pages`], which is generic over
//! [`PageSource`] and therefore also drives the pipeline in tests.
//!
//! Order of effects: validate the input, open the document, create the
//! assets directory, extract every page (writing assets as they come),
//! then classify and serialise the whole document and write the Markdown
//! file in one atomic step.

use crate::config::ConversionConfig;
use crate::error::Pdf2MdError;
use crate::model::{ImageKind, ImageReference};
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::assets::AssetWriter;
use crate::pipeline::document::DocumentDraft;
use crate::pipeline::input::{validate_input, OutputLayout};
use crate::pipeline::pdfium::{bind_pdfium, open_document, read_metadata, PdfiumPage};
use crate::pipeline::source::PageSource;
use crate::pipeline::spans::extract_fragments;
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Rendered pages with more vector drawings than this get an informational log line.
const DRAWING_NOTICE_THRESHOLD: usize = 5;

/// Convert a PDF file to Markdown plus an assets directory.
///
/// # Errors
/// Returns `Err(Pdf2MdError)` only for fatal errors (missing input, corrupt
/// PDF, unwritable output). Failed images and renders are reported in
/// `output.stats.warnings`.
pub async fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let path = input.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_sync(&path, &config))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Blocking variant of [`convert`].
pub fn convert_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let pdf_path = input.as_ref();
    info!("Starting conversion: {}", pdf_path.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    validate_input(pdf_path)?;
    let layout = OutputLayout::for_input(pdf_path, config.output_path.as_deref());

    // ── Step 2: Open document ────────────────────────────────────────────
    let pdfium = bind_pdfium(config.pdfium_library_path.as_deref())?;
    let document = open_document(&pdfium, pdf_path, config.password.as_deref())?;
    let pages = document.pages();
    let total_pages = pages.len() as usize;

    // ── Step 3: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(Pdf2MdError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} of {} pages", page_indices.len(), total_pages);

    // ── Step 4: Extract, assemble, write ─────────────────────────────────
    let selected = page_indices.iter().map(|&idx| {
        let page_number = idx + 1;
        pages
            .get(idx as u16)
            .map(|page| (page_number, PdfiumPage::new(page, page_number)))
            .map_err(|e| Pdf2MdError::TextExtractionFailed {
                page: page_number,
                detail: format!("{:?}", e),
            })
    });

    convert_pages(selected, total_pages, &layout, config)
}

/// Run the two-pass pipeline over already-opened pages.
///
/// `pages` yields `(1-indexed page number, page)` in document order;
/// `total_pages` is the page count of the whole document.
pub fn convert_pages<P, I>(
    pages: I,
    total_pages: usize,
    layout: &OutputLayout,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError>
where
    P: PageSource,
    I: IntoIterator<Item = Result<(usize, P), Pdf2MdError>>,
    I::IntoIter: ExactSizeIterator,
{
    let total_start = Instant::now();
    let pages = pages.into_iter();
    let selected = pages.len();

    let noop = NoopProgressCallback;
    let progress: &dyn ConversionProgressCallback = match config.progress_callback {
        Some(ref cb) => &**cb,
        None => &noop,
    };
    progress.on_conversion_start(selected);

    let writer = AssetWriter::new(&layout.assets_dir, &layout.stem, layout.markdown_dir());
    writer.ensure_dir()?;

    let mut draft = DocumentDraft::for_stem(&layout.stem);
    let mut stats = ConversionStats {
        total_pages,
        ..ConversionStats::default()
    };

    // ── Pass 1: extract every page ───────────────────────────────────────
    for item in pages {
        let (page_number, page) = item?;
        progress.on_page_start(page_number, selected);

        let page_layout = page.layout()?;
        let fragments = extract_fragments(&page_layout, page_number);

        let assets = writer.extract_page_assets(&page, page_number, config);
        if let Some(notice) =
            drawing_notice(page_number, page_layout.drawing_count, &assets.references)
        {
            info!("{}", notice);
        }
        for warning in &assets.warnings {
            progress.on_asset_warning(warning);
        }
        for reference in &assets.references {
            match reference.kind {
                ImageKind::Embedded(_) => stats.image_count += 1,
                ImageKind::PageRender => stats.render_count += 1,
            }
        }

        progress.on_page_complete(
            page_number,
            selected,
            fragments.len(),
            assets.references.len(),
        );
        debug!(
            "Page {}: {} fragments, {} assets, {} warnings",
            page_number,
            fragments.len(),
            assets.references.len(),
            assets.warnings.len()
        );

        stats.processed_pages += 1;
        stats.fragment_count += fragments.len();
        stats.warnings.extend(assets.warnings);
        draft.push_page(page_number, fragments, assets.references);
    }

    // ── Pass 2: classify and serialise ───────────────────────────────────
    let font_stats = draft.font_statistics();
    debug!(
        "Font statistics: average {:.2}pt, max {:.2}pt",
        font_stats.average_font_size, font_stats.max_font_size
    );
    let rendered = draft.render(config.paragraph_mode);
    write_markdown(&layout.markdown_path, &rendered.markdown)?;

    stats.heading_count = rendered.heading_count;
    stats.paragraph_count = rendered.paragraph_count;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {}/{} pages, {} headings, {} images, {} renders, {} warnings, {}ms",
        stats.processed_pages,
        total_pages,
        stats.heading_count,
        stats.image_count,
        stats.render_count,
        stats.warnings.len(),
        stats.total_duration_ms
    );
    progress.on_conversion_complete(&stats);

    Ok(ConversionOutput {
        markdown: rendered.markdown,
        markdown_path: layout.markdown_path.clone(),
        assets_dir: layout.assets_dir.clone(),
        stats,
    })
}

/// Extract PDF metadata without converting content.
pub async fn inspect(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentMetadata, Pdf2MdError> {
    let path = input.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || inspect_sync(&path, &config))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking variant of [`inspect`].
pub fn inspect_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentMetadata, Pdf2MdError> {
    let pdf_path = input.as_ref();
    validate_input(pdf_path)?;

    let pdfium = bind_pdfium(config.pdfium_library_path.as_deref())?;
    let document = open_document(&pdfium, pdf_path, config.password.as_deref())?;
    Ok(read_metadata(&document))
}

/// Atomic write: write to a sibling temp file, then rename over the target.
fn write_markdown(path: &Path, markdown: &str) -> Result<(), Pdf2MdError> {
    let write_failed = |source| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path: PathBuf = path.with_extension("md.tmp");
    std::fs::write(&tmp_path, markdown).map_err(write_failed)?;
    std::fs::rename(&tmp_path, path).map_err(write_failed)?;

    info!("Wrote markdown to {}", path.display());
    Ok(())
}

/// The drawings are only visible in the page rendering, so the notice is
/// emitted only when that rendering exists.
fn drawing_notice(
    page_number: usize,
    drawing_count: usize,
    references: &[ImageReference],
) -> Option<String> {
    let rendered = references
        .iter()
        .any(|reference| reference.kind == ImageKind::PageRender);
    (rendered && drawing_count > DRAWING_NOTICE_THRESHOLD).then(|| {
        format!(
            "Rendered page {} with {} vector drawings",
            page_number, drawing_count
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_notice_requires_page_rendering() {
        let render = ImageReference::page_render(3, "doc_assets/doc_page3_render.png");
        let figure = ImageReference::embedded(3, 1, "doc_assets/doc_page3_img1.png");

        assert_eq!(
            drawing_notice(3, 12, &[figure.clone(), render.clone()]).as_deref(),
            Some("Rendered page 3 with 12 vector drawings")
        );
        assert_eq!(drawing_notice(3, 12, &[figure]), None);
        assert_eq!(drawing_notice(3, 12, &[]), None);
        assert_eq!(drawing_notice(3, 5, &[render]), None);
    }

    #[test]
    fn write_markdown_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.md");

        write_markdown(&path, "first\n").unwrap();
        write_markdown(&path, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!path.with_extension("md.tmp").exists());
    }

    #[test]
    fn write_markdown_into_missing_parent_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let r = write_markdown(&blocker.join("out.md"), "x");
        assert!(matches!(r, Err(Pdf2MdError::OutputWriteFailed { .. })));
    }

    #[test]
    fn missing_input_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.pdf");

        let r = convert_sync(&input, &ConversionConfig::default());

        assert!(matches!(r, Err(Pdf2MdError::FileNotFound { .. })));
        assert!(!dir.path().join("missing_assets").exists());
        assert!(!dir.path().join("missing.md").exists());
    }
}
