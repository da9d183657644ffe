//! Reverse importer: arbitrary HTML to an editable [`Document`].
//!
//! Importing is best effort. Content that follows the recognised
//! conventions (class names such as `header`, `product-grid`, `cta`,
//! `footer`, plus plain headings, paragraphs, images and rules) comes back as
//! structured elements; anything else is recursed into or dropped. Malformed
//! input never fails, it just yields fewer elements.

mod inline;
mod walker;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::diagnostics::DiagnosticSink;
use crate::document::{DEFAULT_WIDTH, Document};

/// Default maximum DOM depth walked below the main container.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum number of DOM elements visited.
pub const DEFAULT_MAX_NODES: usize = 5000;

/// Importer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Deeper subtrees are skipped.
    pub max_depth: usize,
    /// The walk stops after visiting this many elements.
    pub max_nodes: usize,
    /// Layout width used when the HTML does not declare one.
    pub default_width: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            default_width: DEFAULT_WIDTH,
        }
    }
}

#[allow(clippy::expect_used)] // selectors are string literals
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_SUBJECT: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="subject"]"#));
static META_OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static MAIN_CONTAINERS: LazyLock<[Selector; 5]> = LazyLock::new(|| {
    [
        selector(".email-container"),
        selector(".container"),
        selector("main"),
        selector(r#"[role="main"]"#),
        selector("body"),
    ]
});

/// Imports HTML into a new document.
///
/// An empty element list means nothing importable was found.
pub fn import_html(raw: &str, options: &ImportOptions, sink: &dyn DiagnosticSink) -> Document {
    let html = Html::parse_document(raw);
    let container = main_container(&html);

    let mut document = Document::new().with_subject(extract_subject(&html));
    document.width = declared_width(container).unwrap_or(options.default_width);
    document.elements = walker::Walker::new(options, sink).import(container);

    debug!(
        "Imported {} elements ({} total) from {} bytes of HTML",
        document.elements.len(),
        document.element_count(),
        raw.len()
    );
    document
}

fn extract_subject(html: &Html) -> String {
    let title = html
        .select(&TITLE)
        .map(|t| t.text().collect::<String>())
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|t| !t.is_empty());
    let meta = |selector: &Selector| {
        html.select(selector)
            .filter_map(|m| m.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(str::to_string)
    };

    title
        .or_else(|| meta(&META_SUBJECT))
        .or_else(|| meta(&META_OG_TITLE))
        .unwrap_or_default()
}

fn main_container(html: &Html) -> ElementRef<'_> {
    MAIN_CONTAINERS
        .iter()
        .find_map(|selector| html.select(selector).next())
        .unwrap_or_else(|| html.root_element())
}

/// Pixel width from a `width` attribute or a `max-width` style.
fn declared_width(container: ElementRef<'_>) -> Option<u32> {
    let parse = |value: &str| {
        value
            .trim()
            .trim_end_matches("px")
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|w| (200..=2000).contains(w))
    };
    let element = container.value();
    element.attr("width").and_then(parse).or_else(|| {
        element
            .attr("style")
            .map(inline::parse_style_attribute)
            .and_then(|styles| styles.get("max-width").and_then(|w| parse(w)))
    })
}
