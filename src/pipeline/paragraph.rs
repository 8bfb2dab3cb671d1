//! Paragraph assembly: merge consecutive prose fragments into paragraphs.
//!
//! A new paragraph starts on a font-size jump, a vertical gap larger than
//! one and a half lines, or a list marker at the start of the fragment.
//! Headings never reach this stage; the document builder emits them on
//! their own and only feeds the prose runs between them through here.

use crate::model::TextFragment;
use once_cell::sync::Lazy;
use regex::Regex;

/// Font-size difference (points) above which a fragment starts a new paragraph.
pub const FONT_SIZE_BREAK: f64 = 1.0;
/// Vertical gap, as a multiple of the previous fragment's font size, that breaks a paragraph.
pub const LINE_GAP_BREAK: f64 = 1.5;

static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]|\d+\.|\([a-z0-9]+\))").unwrap());

/// Whether `current` opens a new paragraph after `previous`.
pub fn starts_new_paragraph(previous: Option<&TextFragment>, current: &TextFragment) -> bool {
    let Some(prev) = previous else {
        return true;
    };
    (current.font_size - prev.font_size).abs() > FONT_SIZE_BREAK
        || current.bbox.top - prev.bbox.bottom > prev.font_size * LINE_GAP_BREAK
        || RE_LIST_MARKER.is_match(&current.text)
}

/// Group fragments into paragraph strings, joining texts with single spaces.
pub fn merge_into_paragraphs(fragments: &[TextFragment]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut previous: Option<&TextFragment> = None;

    for fragment in fragments {
        if starts_new_paragraph(previous, fragment) && !current.is_empty() {
            paragraphs.push(current.join(" "));
            current.clear();
        }
        current.push(&fragment.text);
        previous = Some(fragment);
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn frag(text: &str, size: f64, top: f64, bottom: f64) -> TextFragment {
        TextFragment {
            text: text.into(),
            font_size: size,
            font_name: "times".into(),
            is_bold: false,
            is_italic: false,
            page_number: 1,
            bbox: BoundingBox::new(72.0, top, 500.0, bottom),
        }
    }

    #[test]
    fn empty_input_yields_no_paragraphs() {
        assert!(merge_into_paragraphs(&[]).is_empty());
    }

    #[test]
    fn small_size_change_and_small_gap_merge() {
        // Gap of 5pt against a threshold of 18pt (1.5 * 12).
        let fragments = [
            frag("The quick brown fox", 12.0, 100.0, 112.0),
            frag("jumps over the lazy dog.", 12.5, 117.0, 129.5),
        ];
        assert_eq!(
            merge_into_paragraphs(&fragments),
            vec!["The quick brown fox jumps over the lazy dog."]
        );
    }

    #[test]
    fn font_jump_breaks() {
        let fragments = [
            frag("Body text", 10.0, 100.0, 110.0),
            frag("Bigger text", 11.5, 111.0, 122.5),
        ];
        assert_eq!(merge_into_paragraphs(&fragments).len(), 2);
    }

    #[test]
    fn large_gap_breaks() {
        let fragments = [
            frag("First paragraph ends.", 12.0, 100.0, 112.0),
            frag("Second begins.", 12.0, 131.0, 143.0),
        ];
        assert_eq!(
            merge_into_paragraphs(&fragments),
            vec!["First paragraph ends.", "Second begins."]
        );
    }

    #[test]
    fn gap_exactly_at_threshold_merges() {
        let fragments = [
            frag("one", 12.0, 100.0, 112.0),
            frag("two", 12.0, 130.0, 142.0),
        ];
        assert_eq!(merge_into_paragraphs(&fragments), vec!["one two"]);
    }

    #[test]
    fn list_markers_break() {
        let fragments = [
            frag("Requirements:", 12.0, 100.0, 112.0),
            frag("- first item", 12.0, 113.0, 125.0),
            frag("* second item", 12.0, 126.0, 138.0),
            frag("+ third item", 12.0, 139.0, 151.0),
            frag("4. fourth item", 12.0, 152.0, 164.0),
            frag("(b) fifth item", 12.0, 165.0, 177.0),
            frag("continues here", 12.0, 178.0, 190.0),
        ];
        assert_eq!(
            merge_into_paragraphs(&fragments),
            vec![
                "Requirements:",
                "- first item",
                "* second item",
                "+ third item",
                "4. fourth item",
                "(b) fifth item continues here",
            ]
        );
    }

    #[test]
    fn never_drops_words() {
        let fragments = [
            frag("alpha beta", 12.0, 100.0, 112.0),
            frag("gamma", 14.0, 113.0, 127.0),
            frag("- delta", 14.0, 128.0, 142.0),
            frag("epsilon zeta", 14.0, 300.0, 314.0),
            frag("eta", 9.0, 315.0, 324.0),
        ];
        let input_words: Vec<&str> = fragments
            .iter()
            .flat_map(|f| f.text.split_whitespace())
            .collect();
        let paragraphs = merge_into_paragraphs(&fragments);
        let output_words: Vec<&str> = paragraphs
            .iter()
            .flat_map(|p| p.split_whitespace())
            .collect();
        assert_eq!(input_words, output_words);
    }
}
