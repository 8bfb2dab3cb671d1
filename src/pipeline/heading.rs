//! Heading classification from typographic signals.
//!
//! A fragment's heading level is decided by an ordered decision table: the
//! first rule whose predicate holds wins. Inputs are the fragment itself and
//! the document-wide [`FontStatistics`], nothing else, so classification is
//! independent of fragment order.
//!
//! The thresholds are empirical. There is no per-document calibration beyond
//! the average and maximum font size.

use crate::model::{FontStatistics, HeadingLevel, TextFragment};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fragments longer than this (in characters) are never headings.
pub const MAX_HEADING_CHARS: usize = 150;
/// H1 when the size reaches this fraction of the document's largest font.
pub const H1_MAX_SIZE_FRACTION: f64 = 0.9;
/// H1 when the size is at least this multiple of the average.
pub const H1_SIZE_RATIO: f64 = 1.5;
pub const H2_SIZE_RATIO: f64 = 1.3;
pub const H2_MAX_WORDS: usize = 8;
pub const H3_SIZE_RATIO: f64 = 1.15;
pub const H3_MAX_WORDS: usize = 6;

/// Leading section numbering: `1.`, `1.2`, `1.2.3.`, `A.`, `IV.`, `a)`, `(3)`.
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+\.|\d+\.\d+\.?|\d+\.\d+\.\d+\.?|[A-Z]\.|\b[IVX]+\.|[a-z]\)|\(\d+\))").unwrap()
});

/// Everything the decision table looks at, computed once per fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSignals {
    pub font_size: f64,
    pub max_font_size: f64,
    pub size_ratio: f64,
    pub is_bold: bool,
    pub is_numbered: bool,
    pub is_all_caps: bool,
    pub word_count: usize,
}

impl HeadingSignals {
    pub fn of(fragment: &TextFragment, stats: &FontStatistics) -> Self {
        let text = fragment.text.trim();
        let word_count = text.split_whitespace().count();
        let size_ratio = if stats.average_font_size > 0.0 {
            fragment.font_size / stats.average_font_size
        } else {
            1.0
        };

        Self {
            font_size: fragment.font_size,
            max_font_size: stats.max_font_size,
            size_ratio,
            is_bold: fragment.is_bold,
            is_numbered: is_numbered(text),
            is_all_caps: is_upper(text) && word_count >= 2,
            word_count,
        }
    }
}

struct HeadingRule {
    level: HeadingLevel,
    applies: fn(&HeadingSignals) -> bool,
}

const RULES: [HeadingRule; 4] = [
    HeadingRule {
        level: HeadingLevel::H1,
        applies: is_title_sized,
    },
    HeadingRule {
        level: HeadingLevel::H2,
        applies: is_major_section,
    },
    HeadingRule {
        level: HeadingLevel::H3,
        applies: is_subsection,
    },
    HeadingRule {
        level: HeadingLevel::H4,
        applies: is_minor_subsection,
    },
];

fn is_title_sized(s: &HeadingSignals) -> bool {
    s.font_size >= s.max_font_size * H1_MAX_SIZE_FRACTION || s.size_ratio >= H1_SIZE_RATIO
}

fn is_major_section(s: &HeadingSignals) -> bool {
    (s.size_ratio >= H2_SIZE_RATIO || s.is_bold)
        && (s.is_numbered || s.is_all_caps || s.word_count <= H2_MAX_WORDS)
}

fn is_subsection(s: &HeadingSignals) -> bool {
    s.size_ratio >= H3_SIZE_RATIO || (s.is_bold && (s.is_numbered || s.word_count <= H3_MAX_WORDS))
}

fn is_minor_subsection(s: &HeadingSignals) -> bool {
    s.is_bold && s.is_numbered
}

/// Decide whether `fragment` is a heading, and at which level.
pub fn classify_heading(fragment: &TextFragment, stats: &FontStatistics) -> Option<HeadingLevel> {
    if fragment.text.trim().chars().count() > MAX_HEADING_CHARS {
        return None;
    }
    let signals = HeadingSignals::of(fragment, stats);
    RULES
        .iter()
        .find(|rule| (rule.applies)(&signals))
        .map(|rule| rule.level)
}

/// Whether the text starts with a section-numbering pattern.
pub fn is_numbered(text: &str) -> bool {
    RE_NUMBERED.is_match(text)
}

/// At least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn frag(text: &str, size: f64, bold: bool) -> TextFragment {
        TextFragment {
            text: text.into(),
            font_size: size,
            font_name: if bold { "arial-bold" } else { "arial" }.into(),
            is_bold: bold,
            is_italic: false,
            page_number: 1,
            bbox: BoundingBox::default(),
        }
    }

    fn stats(avg: f64, max: f64) -> FontStatistics {
        FontStatistics {
            average_font_size: avg,
            max_font_size: max,
        }
    }

    #[test]
    fn numbered_patterns() {
        for t in [
            "1. Introduction",
            "2.3 Scope",
            "2.3. Scope",
            "4.1.2 Details",
            "A. Appendix",
            "IV. Results",
            "b) option",
            "(12) clause",
        ] {
            assert!(is_numbered(t), "{t:?} should be numbered");
        }
        for t in ["Introduction", "a. lower", "(a) letter", "12 apples", "iv. lower roman"] {
            assert!(!is_numbered(t), "{t:?} should not be numbered");
        }
    }

    #[test]
    fn bold_numbered_at_large_ratio_is_level_one() {
        // 18 / 12 = 1.5 and 18 >= 0.9 * 20: the H1 rule fires first.
        let f = frag("1. Introduction", 18.0, true);
        assert_eq!(classify_heading(&f, &stats(12.0, 20.0)), Some(HeadingLevel::H1));
    }

    #[test]
    fn bold_numbered_short_is_level_two() {
        let f = frag("1. Introduction", 14.0, true);
        assert_eq!(classify_heading(&f, &stats(12.0, 20.0)), Some(HeadingLevel::H2));
    }

    #[test]
    fn all_caps_below_ratio_threshold_is_not_a_heading() {
        let f = frag("INTRODUCTION TO THE SYSTEM", 13.0, false);
        assert_eq!(classify_heading(&f, &stats(12.0, 20.0)), None);
    }

    #[test]
    fn ratio_one_point_three_is_level_two() {
        let f = frag("Background and motivation", 13.0, false);
        assert_eq!(classify_heading(&f, &stats(10.0, 20.0)), Some(HeadingLevel::H2));
    }

    #[test]
    fn ratio_one_point_two_is_level_three() {
        let long = "a plain sentence that happens to be set in a slightly larger font size";
        let f = frag(long, 12.0, false);
        assert_eq!(classify_heading(&f, &stats(10.0, 20.0)), Some(HeadingLevel::H3));
    }

    #[test]
    fn bold_numbered_long_line_still_reaches_level_two() {
        // Numbering alone satisfies the H2 word-count clause.
        let f = frag("3. A numbered bold line that runs on for more than eight words", 10.0, true);
        assert_eq!(classify_heading(&f, &stats(10.0, 20.0)), Some(HeadingLevel::H2));
    }

    #[test]
    fn bold_long_unnumbered_is_not_a_heading() {
        let f = frag("this bold sentence has quite a few words in it overall", 10.0, true);
        assert_eq!(classify_heading(&f, &stats(10.0, 20.0)), None);
    }

    #[test]
    fn over_long_text_is_never_a_heading() {
        let f = frag(&"x".repeat(151), 40.0, true);
        assert_eq!(classify_heading(&f, &stats(10.0, 40.0)), None);
        let f = frag(&"x".repeat(150), 40.0, true);
        assert_eq!(classify_heading(&f, &stats(10.0, 40.0)), Some(HeadingLevel::H1));
    }

    #[test]
    fn zero_average_uses_unit_ratio() {
        let f = frag("plain words here", 10.0, false);
        assert_eq!(classify_heading(&f, &stats(0.0, 100.0)), None);
    }

    #[test]
    fn all_caps_needs_two_words() {
        let s = stats(10.0, 20.0);
        let one = HeadingSignals::of(&frag("SUMMARY", 10.0, false), &s);
        let two = HeadingSignals::of(&frag("EXECUTIVE SUMMARY", 10.0, false), &s);
        let digits = HeadingSignals::of(&frag("1. SCOPE OF WORK", 10.0, false), &s);
        assert!(!one.is_all_caps);
        assert!(two.is_all_caps);
        assert!(digits.is_all_caps);
    }

    #[test]
    fn classification_is_pure() {
        let s = stats(11.0, 24.0);
        let f = frag("2.1 Method", 13.0, true);
        let first = classify_heading(&f, &s);
        for _ in 0..10 {
            assert_eq!(classify_heading(&f, &s), first);
        }
    }

    #[test]
    fn levels_stay_within_one_to_four() {
        let s = stats(11.0, 24.0);
        for size in [6.0, 9.0, 11.0, 12.5, 13.0, 14.0, 16.0, 20.0, 24.0, 30.0] {
            for bold in [false, true] {
                for text in ["1. Intro", "Short", "A MUCH LONGER HEADING IN CAPS", "plain prose with many many many words in it"] {
                    if let Some(level) = classify_heading(&frag(text, size, bold), &s) {
                        assert!((1..=4).contains(&level.depth()));
                    }
                }
            }
        }
    }
}
