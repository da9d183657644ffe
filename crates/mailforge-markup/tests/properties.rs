//! Property tests for the markup compiler.

use mailforge_markup::{compile_markup, to_plain_text};
use proptest::prelude::*;

/// Words without any markup characters.
fn plain_word() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z,]{0,8}"
}

/// A chunk of one to three lines of plain words.
fn plain_chunk() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(plain_word(), 1..5).prop_map(|words| words.join(" ")),
        1..4,
    )
}

proptest! {
    #[test]
    fn compile_is_deterministic(source in "[ -~\n]{0,200}") {
        prop_assert_eq!(compile_markup(&source), compile_markup(&source));
        prop_assert_eq!(to_plain_text(&source), to_plain_text(&source));
    }

    #[test]
    fn plain_chunks_become_exactly_one_paragraph_each(chunks in prop::collection::vec(plain_chunk(), 1..5)) {
        let source = chunks
            .iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let expected: String = chunks
            .iter()
            .map(|lines| format!("<p>{}</p>", lines.join("<br>")))
            .collect();

        prop_assert_eq!(compile_markup(&source), expected);
    }

    #[test]
    fn compile_never_panics(source in ".{0,300}") {
        let _ = compile_markup(&source);
        let _ = to_plain_text(&source);
    }
}

#[test]
fn test_mixed_document() {
    let source = "Hello **friend**,\nwelcome.\n\n> quoted\n\n1. first\n2. second\n\n- a\n- b\n\nBye";
    assert_eq!(
        compile_markup(source),
        "<p>Hello <strong>friend</strong>,<br>welcome.</p>\
         <blockquote>quoted</blockquote>\
         <ol><li>first</li><li>second</li></ol>\
         <ul><li>a</li><li>b</li></ul>\
         <p>Bye</p>"
    );
}
