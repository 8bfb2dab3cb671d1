//! Document assembly: serialise extracted pages into the final Markdown.
//!
//! The builder is the second pass of the two-pass design. By the time
//! [`DocumentDraft::render`] runs, every page has been extracted, so the
//! document-wide [`FontStatistics`] are known before the first fragment is
//! classified.
//!
//! ## Output layout
//!
//! ```text
//! # <stem with underscores as spaces>
//!
//! > Converted from PDF automatically with section detection.
//! > Verify formatting, links, and section hierarchy manually.
//!
//! <!-- Page 1 -->
//!
//! ![Figure 1.1](stem_assets/stem_page1_img1.png)
//!
//! ![Page 1 rendering](stem_assets/stem_page1_render.png)
//!
//! ## Heading
//!
//! Paragraph text …
//! ```

use crate::config::ParagraphMode;
use crate::model::{FontStatistics, ImageReference, TextFragment};
use crate::pipeline::heading::classify_heading;
use crate::pipeline::normalize::clean_text;
use crate::pipeline::paragraph::merge_into_paragraphs;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Block-quoted notice placed under the title.
pub const DISCLAIMER: [&str; 2] = [
    "> Converted from PDF automatically with section detection.",
    "> Verify formatting, links, and section hierarchy manually.",
];

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

/// All fragments and image references of a document, in page order.
#[derive(Debug, Clone, Default)]
pub struct DocumentDraft {
    /// Title text (without the leading `# `).
    pub title: String,
    pub fragments: Vec<TextFragment>,
    pub images: BTreeMap<usize, Vec<ImageReference>>,
}

/// Markdown text plus what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub markdown: String,
    pub heading_count: usize,
    pub paragraph_count: usize,
}

impl DocumentDraft {
    /// Start a draft titled after the input's file stem.
    pub fn for_stem(stem: &str) -> Self {
        Self {
            title: stem.replace('_', " "),
            ..Self::default()
        }
    }

    /// Append one extracted page. Pages must arrive in document order.
    pub fn push_page(
        &mut self,
        page_number: usize,
        fragments: Vec<TextFragment>,
        images: Vec<ImageReference>,
    ) {
        self.fragments.extend(fragments);
        if !images.is_empty() {
            self.images.entry(page_number).or_default().extend(images);
        }
    }

    pub fn font_statistics(&self) -> FontStatistics {
        FontStatistics::from_fragments(&self.fragments)
    }

    /// Classify, normalise and serialise the whole document.
    pub fn render(&self, mode: ParagraphMode) -> RenderedDocument {
        let stats = self.font_statistics();

        let mut pages: BTreeMap<usize, Vec<&TextFragment>> = BTreeMap::new();
        for fragment in &self.fragments {
            pages.entry(fragment.page_number).or_default().push(fragment);
        }
        for page in self.images.keys() {
            pages.entry(*page).or_default();
        }

        let mut out = MarkdownLines::new(mode);

        for (page, fragments) in &pages {
            out.page_marker(*page);
            for image in self.images.get(page).into_iter().flatten() {
                out.image(image);
            }

            for fragment in fragments {
                let cleaned = fragment.with_text(clean_text(&fragment.text));
                match classify_heading(fragment, &stats) {
                    Some(level) => out.heading(&format!("{} {}", level.marker(), cleaned.text)),
                    None => out.prose(cleaned),
                }
            }
            out.flush_prose();
        }

        out.finish(&self.title)
    }
}

/// Line buffer that knows the blank-line conventions.
struct MarkdownLines {
    mode: ParagraphMode,
    lines: Vec<String>,
    prose: Vec<TextFragment>,
    heading_count: usize,
    paragraph_count: usize,
}

impl MarkdownLines {
    fn new(mode: ParagraphMode) -> Self {
        Self {
            mode,
            lines: Vec::new(),
            prose: Vec::new(),
            heading_count: 0,
            paragraph_count: 0,
        }
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn page_marker(&mut self, page: usize) {
        if !self.lines.is_empty() {
            self.blank();
        }
        self.lines.push(format!("<!-- Page {page} -->"));
        self.blank();
    }

    fn image(&mut self, image: &ImageReference) {
        self.lines.push(image.markdown());
        self.blank();
    }

    fn heading(&mut self, line: &str) {
        self.flush_prose();
        self.blank();
        self.lines.push(line.to_string());
        self.blank();
        self.heading_count += 1;
    }

    fn prose(&mut self, fragment: TextFragment) {
        self.prose.push(fragment);
    }

    fn flush_prose(&mut self) {
        if self.prose.is_empty() {
            return;
        }
        match self.mode {
            ParagraphMode::Lines => {
                self.paragraph_count += self.prose.len();
                self.lines.extend(self.prose.drain(..).map(|f| f.text));
            }
            ParagraphMode::Paragraphs => {
                for paragraph in merge_into_paragraphs(&self.prose) {
                    self.lines.push(paragraph);
                    self.blank();
                    self.paragraph_count += 1;
                }
                self.prose.clear();
            }
        }
    }

    fn finish(mut self, title: &str) -> RenderedDocument {
        self.flush_prose();

        let mut all = Vec::with_capacity(self.lines.len() + 5);
        all.push(format!("# {title}"));
        all.push(String::new());
        all.extend(DISCLAIMER.iter().map(|l| l.to_string()));
        all.push(String::new());
        all.append(&mut self.lines);

        let markdown = ensure_final_newline(&collapse_blank_lines(&all.join("\n")));
        RenderedDocument {
            markdown,
            heading_count: self.heading_count,
            paragraph_count: self.paragraph_count,
        }
    }
}

/// Collapse any run of four or more newlines to exactly three.
pub fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

fn ensure_final_newline(input: &str) -> String {
    format!("{}\n", input.trim_end())
}
