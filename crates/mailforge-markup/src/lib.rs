//! # mailforge-markup
//!
//! Lightweight text markup for email content blocks.
//!
//! ## Features
//!
//! - **Emphasis**: `**bold**`, `*italic*`, `_italic_` and `***both***`
//! - **Lists**: `- item` / `* item` bullets and `1. item` numbered lines
//! - **Quotes**: lines starting with `> `
//! - **Paragraphs**: blank lines separate blocks, single newlines become `<br>`
//! - **Columns**: `[COLUMN_START] left [COLUMN_BREAK] right [COLUMN_END]`
//!   produces a nested two-column grid
//! - **Plain text**: the same source rendered for the text/plain alternative
//!
//! ## Quick Start
//!
//! ```
//! use mailforge_markup::{compile_markup, to_plain_text};
//!
//! let html = compile_markup("**Big** news\n\n- one\n- two");
//! assert_eq!(
//!     html,
//!     "<p><strong>Big</strong> news</p><ul><li>one</li><li>two</li></ul>"
//! );
//!
//! let text = to_plain_text("**Big** news\n\n- one\n- two");
//! assert_eq!(text, "Big news\n\n• one\n• two");
//! ```
//!
//! Compilation is deterministic: the same input always yields the same
//! fragment, and unterminated markers are kept as literal text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod block;
mod columns;
mod inline;
mod plain;

pub use columns::{COLUMN_BREAK, COLUMN_END, COLUMN_START, MAX_COLUMN_NESTING};
pub use plain::to_plain_text;

use columns::Segment;

/// Compiles a markup string into an HTML fragment.
///
/// Column markers are expanded recursively first. Each remaining text run
/// then gets its emphasis substituted (bold before italic, so nested
/// emphasis resolves outer-first) and its lines grouped into paragraph, list
/// and quote blocks. An emphasis pair never spans a column boundary.
#[must_use]
pub fn compile_markup(content: &str) -> String {
    compile_segments(content, 0)
}

fn compile_text(text: &str) -> String {
    block::compile_blocks(&inline::apply_emphasis(text))
}

fn compile_segments(text: &str, depth: usize) -> String {
    let mut out = String::new();

    for segment in columns::split_columns(text) {
        match segment {
            Segment::Text(text) => out.push_str(&compile_text(text)),
            Segment::Columns { left, right, .. } if depth < MAX_COLUMN_NESTING => {
                let left = compile_segments(left, depth + 1);
                let right = compile_segments(right, depth + 1);
                out.push_str(&columns::column_grid(&left, &right));
            }
            // Too deeply nested: keep the markers as literal text
            Segment::Columns { raw, .. } => out.push_str(&compile_text(raw)),
        }
    }

    out
}
