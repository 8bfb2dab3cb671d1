//! Input validation and output placement.
//!
//! The input is checked before pdfium is bound or anything is written, so a
//! missing or non-PDF path fails without side effects. We look for the PDF
//! header (`%PDF`) here so callers get a meaningful error rather than a
//! pdfium load failure.

use crate::error::Pdf2MdError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDF readers accept junk before the header as long as `%PDF` appears in
/// the first kilobyte.
const HEADER_SEARCH_LEN: u64 = 1024;

/// Check that `path` is an existing, readable file with a `%PDF` header in
/// its first [`HEADER_SEARCH_LEN`] bytes.
pub fn validate_input(path: &Path) -> Result<(), Pdf2MdError> {
    if !path.is_file() {
        return Err(Pdf2MdError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(f) => {
            let mut head = Vec::new();
            let read = f.take(HEADER_SEARCH_LEN).read_to_end(&mut head);
            if read.is_ok() && !has_pdf_header(&head) {
                let mut magic = [0u8; 4];
                let n = head.len().min(magic.len());
                magic[..n].copy_from_slice(&head[..n]);
                return Err(Pdf2MdError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2MdError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Pdf2MdError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(())
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"%PDF")
}

/// Where one conversion writes its Markdown and assets.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    /// Input file stem; names the title, the assets directory and every asset file.
    pub stem: String,
    pub markdown_path: PathBuf,
    /// `<markdown dir>/<stem>_assets`
    pub assets_dir: PathBuf,
}

impl OutputLayout {
    /// Markdown defaults to `<input stem>.md` beside the input; assets always
    /// sit beside the Markdown file.
    pub fn for_input(pdf_path: &Path, output_path: Option<&Path>) -> Self {
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let markdown_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| pdf_path.with_extension("md"));
        let assets_dir = markdown_dir(&markdown_path).join(format!("{stem}_assets"));

        Self {
            stem,
            markdown_path,
            assets_dir,
        }
    }

    /// Directory relative asset links are resolved against.
    pub fn markdown_dir(&self) -> PathBuf {
        markdown_dir(&self.markdown_path)
    }
}

fn markdown_dir(markdown_path: &Path) -> PathBuf {
    markdown_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
