//! Forward renderer: [`Document`] to a complete HTML email plus its plain
//! text companion.
//!
//! Rendering is deterministic. Element ids never appear in the output, and
//! the same document always produces byte-identical results. Header and
//! footer elements only leave placeholders; branding is spliced in by
//! [`RenderedEmail::with_branding`].

mod elements;
mod html;
mod layout;
mod text;

pub use html::{InlineStyle, escape_html};
pub(crate) use html::escape_text;

use crate::diagnostics::DiagnosticSink;
use crate::document::Document;

/// Placeholder left where a header element was.
pub const HEADER_PLACEHOLDER: &str = "<!-- mailforge:header -->";

/// Placeholder left where a footer element was.
pub const FOOTER_PLACEHOLDER: &str = "<!-- mailforge:footer -->";

/// Default maximum container nesting rendered.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Pre-resolved branding supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branding {
    /// HTML replacing header placeholders.
    pub header_html: String,
    /// HTML replacing footer placeholders.
    pub footer_html: String,
    /// Plain text put before the text body when the email has a header.
    pub header_text: Option<String>,
    /// Plain text put after the text body when the email has a footer.
    pub footer_text: Option<String>,
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Branding applied to the output, if any.
    pub branding: Option<Branding>,
    /// Containers nested deeper than this are dropped.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            branding: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    /// Sets the branding.
    #[must_use]
    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = Some(branding);
        self
    }
}

/// Rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Complete HTML document.
    pub html: String,
    /// Plain text alternative.
    pub text: String,
}

impl RenderedEmail {
    /// Replaces header/footer placeholders with branding.
    #[must_use]
    pub fn with_branding(self, branding: &Branding) -> Self {
        let has_header = self.html.contains(HEADER_PLACEHOLDER);
        let has_footer = self.html.contains(FOOTER_PLACEHOLDER);

        let html = self
            .html
            .replace(HEADER_PLACEHOLDER, &branding.header_html)
            .replace(FOOTER_PLACEHOLDER, &branding.footer_html);

        let mut blocks = Vec::new();
        if let Some(header) = branding.header_text.as_deref().filter(|_| has_header) {
            blocks.push(header.trim());
        }
        blocks.push(self.text.as_str());
        if let Some(footer) = branding.footer_text.as_deref().filter(|_| has_footer) {
            blocks.push(footer.trim());
        }
        let text = blocks
            .into_iter()
            .filter(|b| !b.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self { html, text }
    }
}

/// Renders a document.
///
/// Never fails: anything that has to be degraded is reported to `sink`.
pub fn render(
    document: &Document,
    options: &RenderOptions,
    sink: &dyn DiagnosticSink,
) -> RenderedEmail {
    let renderer = elements::Renderer::new(options, sink);
    let body = renderer.render_all(&document.elements);
    let html = layout::wrap_document(&document.subject, document.width, &body);
    let text = text::render_text(&document.elements, options.max_depth);

    let rendered = RenderedEmail { html, text };
    match &options.branding {
        Some(branding) => rendered.with_branding(branding),
        None => rendered,
    }
}
