//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step. Only
//! [`pdfium`] touches the PDF library; everything after it works on the
//! plain types in [`source`], so each stage is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─ spans ─────────────┐
//! pdfium ──▶ │                     ├──▶ document ──▶ Markdown file
//! (per page) └─ assets (images) ───┘    (heading, normalize, paragraph)
//! ```
//!
//! 1. [`input`]: validate the PDF path and decide where output goes
//! 2. [`pdfium`]: bind the library, open the document, adapt each page to
//!    [`source::PageSource`]
//! 3. [`spans`]: turn the page layout into [`crate::model::TextFragment`]s
//! 4. [`assets`]: write embedded images and the page render; failures are
//!    warnings
//! 5. [`document`]: once every page is in, compute font statistics, then
//!    classify headings ([`heading`]), clean text ([`normalize`]), merge
//!    prose ([`paragraph`]) and serialise

pub mod assets;
pub mod document;
pub mod heading;
pub mod input;
pub mod normalize;
pub mod paragraph;
pub mod pdfium;
pub mod source;
pub mod spans;
