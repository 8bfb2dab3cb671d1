//! Text normalisation applied to every fragment before it is emitted.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bullet and dash glyphs rewritten to a plain Markdown list hyphen.
const BULLET_GLYPHS: [char; 8] = ['•', '−', '–', '➢', '◦', '●', '■', '□'];

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace bullet glyphs with `-`, collapse whitespace runs, trim.
///
/// Total and idempotent: `clean_text(&clean_text(s)) == clean_text(s)`.
pub fn clean_text(text: &str) -> String {
    let text = text.replace(BULLET_GLYPHS, "-");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_bullets() {
        assert_eq!(clean_text("• first"), "- first");
        assert_eq!(clean_text("■ box □ empty"), "- box - empty");
        assert_eq!(clean_text("➢ arrow ◦ ring ● dot"), "- arrow - ring - dot");
        assert_eq!(clean_text("a – b − c"), "a - b - c");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  a\t\tb\n\nc  "), "a b c");
        assert_eq!(clean_text("\u{00A0}x\u{2003}y"), "x y");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn idempotent() {
        for s in [
            "• Item   one\n",
            "Plain text",
            "  – dash\t\tseparated  ",
            "■□●◦➢−–•",
            "",
        ] {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "input: {s:?}");
        }
    }
}
