//! Emphasis substitution.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Compiles one of the fixed patterns below.
#[allow(clippy::expect_used)] // patterns are literals covered by tests
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("emphasis pattern is valid")
}

/// `***both***`, bold around italic.
pub(crate) static STRONG_EM: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\*\*\*([^\s*](?:[^*\n]*?[^\s*])?)\*\*\*"));

/// `**bold**`, shortest pairing on a single line. The body neither starts
/// nor ends with `*`.
pub(crate) static BOLD: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\*\*([^*\n](?:[^\n]*?[^*\n])?)\*\*"));

/// `*italic*`; the markers must hug non-space text so `* item` stays a bullet.
pub(crate) static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\*([^\s*](?:[^*\n]*?[^\s*])?)\*"));

/// `_italic_`, only when the opening underscore starts a word.
pub(crate) static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(^|[^\w])_([^\s_](?:[^_\n]*?[^\s_])?)_"));

static EMPHASIS_TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"</?(?:strong|em)>"));

/// True when every emphasis tag inside `body` also closes inside it.
fn is_balanced(body: &str) -> bool {
    let mut open = Vec::new();
    for tag in EMPHASIS_TAG.find_iter(body) {
        let tag = tag.as_str();
        if let Some(name) = tag.strip_prefix("</") {
            if open.pop() != Some(name.trim_end_matches('>')) {
                return false;
            }
        } else {
            open.push(&tag[1..tag.len() - 1]);
        }
    }
    open.is_empty()
}

/// Replaces emphasis markers with `<strong>`/`<em>` tags.
///
/// Triple markers run first, then bold, so in `**a *b* c**` the outer pair
/// wins and the inner pair becomes emphasis inside it. An italic pair whose
/// body would cut through an earlier tag stays literal.
pub(crate) fn apply_emphasis(text: &str) -> String {
    let both = STRONG_EM.replace_all(text, "<strong><em>$1</em></strong>");
    let bold = BOLD.replace_all(&both, "<strong>$1</strong>");
    let italic = ITALIC_STAR.replace_all(&bold, |caps: &Captures<'_>| {
        if is_balanced(&caps[1]) {
            format!("<em>{}</em>", &caps[1])
        } else {
            caps[0].to_string()
        }
    });
    ITALIC_UNDERSCORE
        .replace_all(&italic, |caps: &Captures<'_>| {
            if is_balanced(&caps[2]) {
                format!("{}<em>{}</em>", &caps[1], &caps[2])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Removes emphasis markers, keeping the enclosed text.
pub(crate) fn strip_emphasis(text: &str) -> String {
    let both = STRONG_EM.replace_all(text, "$1");
    let bold = BOLD.replace_all(&both, "$1");
    let italic = ITALIC_STAR.replace_all(&bold, "$1");
    ITALIC_UNDERSCORE
        .replace_all(&italic, "${1}${2}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(apply_emphasis("**hi**"), "<strong>hi</strong>");
        assert_eq!(
            apply_emphasis("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn test_italic_variants() {
        assert_eq!(apply_emphasis("*x*"), "<em>x</em>");
        assert_eq!(apply_emphasis("say _this_ now"), "say <em>this</em> now");
    }

    #[test]
    fn test_unterminated_markers_stay_literal() {
        assert_eq!(apply_emphasis("**open"), "**open");
        assert_eq!(apply_emphasis("*open"), "*open");
        assert_eq!(apply_emphasis("_open"), "_open");
    }

    #[test]
    fn test_nested_resolves_outer_first() {
        assert_eq!(
            apply_emphasis("**a *b* c**"),
            "<strong>a <em>b</em> c</strong>"
        );
    }

    #[test]
    fn test_bullet_marker_is_not_emphasis() {
        assert_eq!(apply_emphasis("* item"), "* item");
        assert_eq!(apply_emphasis("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_snake_case_is_not_emphasis() {
        assert_eq!(apply_emphasis("snake_case_name"), "snake_case_name");
    }

    #[test]
    fn test_pairs_do_not_span_lines() {
        assert_eq!(apply_emphasis("**a\nb**"), "**a\nb**");
    }

    #[test]
    fn test_triple_marker_nests_properly() {
        assert_eq!(apply_emphasis("***x***"), "<strong><em>x</em></strong>");
        assert_eq!(
            apply_emphasis("a ***big deal*** b"),
            "a <strong><em>big deal</em></strong> b"
        );
    }

    #[test]
    fn test_crossing_pairs_keep_tags_nested() {
        assert_eq!(apply_emphasis("**a *b** c*"), "<strong>a *b</strong> c*");
        assert_eq!(apply_emphasis("**a _b** c_"), "<strong>a _b</strong> c_");
    }

    #[test]
    fn test_balance_check() {
        assert!(is_balanced("a <strong>b</strong> <em>c</em>"));
        assert!(!is_balanced("b</strong> c"));
        assert!(!is_balanced("<strong><em>x</strong></em>"));
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip_emphasis("**a** *b* _c_ ***d***"), "a b c d");
    }
}
