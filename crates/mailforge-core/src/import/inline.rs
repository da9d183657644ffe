//! Flattening HTML subtrees into markup text.

use std::collections::BTreeMap;

use scraper::{ElementRef, Node};

use crate::render::escape_text;

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "table", "tbody", "ul", "ol",
    "blockquote", "section", "article", "header", "footer", "center",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "head", "title", "template", "noscript"];

/// Returns true for elements whose content never becomes email text.
pub(crate) fn is_skipped(tag: &str) -> bool {
    SKIPPED_TAGS.contains(&tag)
}

/// Converts an element's content to markup: `strong`/`b` become `**`,
/// `em`/`i` become `*`, `br` and block boundaries become line breaks, and
/// whitespace is collapsed. Text is re-escaped, since element content is
/// rendered as HTML.
pub(crate) fn inline_markup(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    append_children(element, &mut raw);
    normalize_lines(&raw)
}

/// Whitespace-collapsed text content, unescaped.
pub(crate) fn plain_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn append_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(&collapse_runs(text))),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    append_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn append_element(element: ElementRef<'_>, out: &mut String) {
    let tag = element.value().name();
    match tag {
        "br" => out.push('\n'),
        "strong" | "b" => wrap_emphasis(element, "**", out),
        "em" | "i" => wrap_emphasis(element, "*", out),
        _ if is_skipped(tag) => {}
        _ if BLOCK_TAGS.contains(&tag) => {
            out.push('\n');
            append_children(element, out);
            out.push('\n');
        }
        _ => append_children(element, out),
    }
}

/// Emits `marker inner marker`, keeping surrounding spaces outside the
/// markers so the result still parses as emphasis.
fn wrap_emphasis(element: ElementRef<'_>, marker: &str, out: &mut String) {
    let mut inner = String::new();
    append_children(element, &mut inner);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        out.push_str(&inner);
        return;
    }
    if inner.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    if inner.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Replaces every whitespace run with a single space.
fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims every line and drops empty ones.
fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses an inline `style` attribute into declarations.
pub(crate) fn parse_style_attribute(style: &str) -> BTreeMap<String, String> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            (!property.is_empty() && !value.is_empty()).then(|| (property, value.to_string()))
        })
        .collect()
}
