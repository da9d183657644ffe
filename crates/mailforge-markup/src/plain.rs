//! Plain-text rendering of markup for the text/plain alternative.

use crate::block::LineKind;
use crate::columns::{COLUMN_BREAK, COLUMN_END, COLUMN_START};
use crate::inline::strip_emphasis;

/// Renders markup as plain text.
///
/// Emphasis markers are removed, bullet lines become `• item`, numbered and
/// quoted lines are kept as written, and column markers dissolve into
/// blank-line separated text. Runs of blank lines collapse to one. The basic
/// character references (`&amp;`, `&lt;`, `&gt;`, `&quot;`, `&#39;`) are
/// decoded.
#[must_use]
pub fn to_plain_text(content: &str) -> String {
    let dissolved = content
        .replace(COLUMN_START, "\n\n")
        .replace(COLUMN_BREAK, "\n\n")
        .replace(COLUMN_END, "\n\n");
    let stripped = strip_emphasis(&dissolved);

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in stripped.lines() {
        match LineKind::classify(line) {
            LineKind::Blank => {
                if !previous_blank {
                    lines.push(String::new());
                }
                previous_blank = true;
                continue;
            }
            LineKind::Bullet(text) => lines.push(format!("• {}", decode_entities(text))),
            _ => lines.push(decode_entities(line.trim())),
        }
        previous_blank = false;
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines.join("\n")
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    // `&amp;` last so `&amp;lt;` stays `&lt;`.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emphasis() {
        assert_eq!(to_plain_text("**bold** and *italic*"), "bold and italic");
    }

    #[test]
    fn test_bullets_get_dots_numbers_unchanged() {
        assert_eq!(
            to_plain_text("- a\n* b\n\n1. one\n2. two"),
            "• a\n• b\n\n1. one\n2. two"
        );
    }

    #[test]
    fn test_columns_dissolve() {
        assert_eq!(
            to_plain_text("Top[COLUMN_START]Left[COLUMN_BREAK]Right[COLUMN_END]"),
            "Top\n\nLeft\n\nRight"
        );
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(to_plain_text("\n\na\n\n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_character_references_decoded() {
        assert_eq!(
            to_plain_text("Use &lt;b&gt; &amp; &quot;more&quot;\n- Tom &amp; Jerry\n&amp;lt;"),
            "Use <b> & \"more\"\n• Tom & Jerry\n&lt;"
        );
    }

    #[test]
    fn test_unterminated_marker_kept() {
        assert_eq!(to_plain_text("**open"), "**open");
    }
}
