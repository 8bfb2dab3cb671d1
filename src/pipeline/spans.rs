//! Span extraction: turn one page's layout into [`TextFragment`]s.

use crate::model::{TextFragment, DEFAULT_FONT_SIZE, SPAN_FLAG_BOLD, SPAN_FLAG_ITALIC};
use crate::pipeline::source::{LayoutBlock, PageLayout, RawSpan};

/// Extract one fragment per non-empty text span, in decoder order.
///
/// Image blocks are skipped. Bold/italic detection is deliberately
/// permissive: either the font name or the style-flag bit is enough.
pub fn extract_fragments(layout: &PageLayout, page_number: usize) -> Vec<TextFragment> {
    layout
        .blocks
        .iter()
        .filter_map(|block| match block {
            LayoutBlock::Text { lines } => Some(lines),
            LayoutBlock::Image { .. } => None,
        })
        .flatten()
        .flat_map(|line| line.spans.iter())
        .filter_map(|span| to_fragment(span, page_number))
        .collect()
}

fn to_fragment(span: &RawSpan, page_number: usize) -> Option<TextFragment> {
    let text = span.text.trim();
    if text.is_empty() {
        return None;
    }

    let font_name = span.font.to_lowercase();
    let font_size = if span.size.is_finite() && span.size > 0.0 {
        span.size
    } else {
        DEFAULT_FONT_SIZE
    };

    Some(TextFragment {
        text: text.to_string(),
        font_size,
        is_bold: font_name.contains("bold") || span.flags & SPAN_FLAG_BOLD != 0,
        is_italic: font_name.contains("italic") || span.flags & SPAN_FLAG_ITALIC != 0,
        font_name,
        page_number,
        bbox: span.bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;
    use crate::pipeline::source::LayoutLine;

    fn span(text: &str, font: &str, flags: u32) -> RawSpan {
        RawSpan {
            text: text.into(),
            size: 11.0,
            font: font.into(),
            flags,
            bbox: BoundingBox::new(10.0, 20.0, 100.0, 31.0),
        }
    }

    fn page(spans: Vec<RawSpan>) -> PageLayout {
        PageLayout {
            blocks: vec![LayoutBlock::Text {
                lines: vec![LayoutLine { spans }],
            }],
            drawing_count: 0,
        }
    }

    #[test]
    fn trims_and_drops_blank_spans() {
        let layout = page(vec![
            span("  Hello  ", "Helvetica", 0),
            span("   ", "Helvetica", 0),
            span("", "Helvetica", 0),
            span("\u{2003}world\n", "Helvetica", 0),
        ]);
        let fragments = extract_fragments(&layout, 4);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "world"]);
        assert!(fragments.iter().all(|f| f.page_number == 4));
    }

    #[test]
    fn skips_image_blocks() {
        let mut layout = page(vec![span("caption", "Times", 0)]);
        layout.blocks.insert(
            0,
            LayoutBlock::Image {
                bbox: BoundingBox::default(),
            },
        );
        let fragments = extract_fragments(&layout, 1);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "caption");
    }

    #[test]
    fn bold_from_name_or_flag() {
        let layout = page(vec![
            span("a", "Arial-BoldMT", 0),
            span("b", "Arial", SPAN_FLAG_BOLD),
            span("c", "Arial", 0),
        ]);
        let bold: Vec<bool> = extract_fragments(&layout, 1)
            .iter()
            .map(|f| f.is_bold)
            .collect();
        assert_eq!(bold, vec![true, true, false]);
    }

    #[test]
    fn italic_from_name_or_flag() {
        let layout = page(vec![
            span("a", "Garamond-Italic", 0),
            span("b", "Garamond", SPAN_FLAG_ITALIC),
            span("c", "Garamond", SPAN_FLAG_BOLD),
        ]);
        let italic: Vec<bool> = extract_fragments(&layout, 1)
            .iter()
            .map(|f| f.is_italic)
            .collect();
        assert_eq!(italic, vec![true, true, false]);
    }

    #[test]
    fn font_name_is_lowercased() {
        let fragments = extract_fragments(&page(vec![span("x", "TimesNewRoman-Bold", 0)]), 1);
        assert_eq!(fragments[0].font_name, "timesnewroman-bold");
    }

    #[test]
    fn invalid_size_falls_back_to_default() {
        let mut s = span("x", "Arial", 0);
        s.size = 0.0;
        let fragments = extract_fragments(&page(vec![s]), 1);
        assert_eq!(fragments[0].font_size, DEFAULT_FONT_SIZE);
    }
}
