//! Per-element HTML fragments.

use mailforge_markup::compile_markup;

use super::html::{InlineStyle, escape_html, half_length};
use super::{FOOTER_PLACEHOLDER, HEADER_PLACEHOLDER, RenderOptions};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::document::{
    Alignment, ButtonProperties, ColumnPair, ColumnsProperties, DividerProperties, Element,
    ElementKind, EmbedKind, EmbedProperties, ImageProperties, PLACEHOLDER_IMAGE,
    SectionProperties, SocialProperties, SpacerProperties, TextProperties,
};

const TABLE_ATTRS: &str =
    r#"role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0""#;

const EMPTY_COLUMN: &str = r#"<div style="padding: 20px; text-align: center; color: #999999; border: 2px dashed #dddddd; font-family: Arial, sans-serif; font-size: 14px;">Drop elements here</div>"#;

const DEFAULT_EMBED_FALLBACK: &str = "Embedded content is not available.";

/// Returns true if an image source can be used as-is.
pub(crate) fn is_usable_image_source(src: &str) -> bool {
    let src = src.trim().to_ascii_lowercase();
    ["http://", "https://", "data:", "cid:"]
        .iter()
        .any(|scheme| src.starts_with(scheme) && src.len() > scheme.len())
}

/// Extracts the video id from a YouTube watch, short or embed URL.
pub(crate) fn youtube_video_id(url: &str) -> Option<&str> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_prefix("m.").unwrap_or(rest);

    let candidate = if let Some(path) = rest.strip_prefix("youtu.be/") {
        path
    } else if let Some(path) = rest.strip_prefix("youtube.com/embed/") {
        path
    } else if let Some(query) = rest.strip_prefix("youtube.com/watch?") {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))?
    } else {
        return None;
    };

    let id = candidate
        .split(['?', '&', '#', '/'])
        .next()
        .unwrap_or_default();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

fn alignment_or(alignment: Option<Alignment>, fallback: Alignment) -> &'static str {
    alignment.unwrap_or(fallback).as_str()
}

/// Walks the element tree producing HTML.
pub(crate) struct Renderer<'a> {
    options: &'a RenderOptions,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(options: &'a RenderOptions, sink: &'a dyn DiagnosticSink) -> Self {
        Self { options, sink }
    }

    /// Renders top-level elements, one fragment per line.
    pub(crate) fn render_all(&self, elements: &[Element]) -> String {
        self.render_list(elements.iter(), 0)
    }

    fn render_list<'e>(&self, elements: impl Iterator<Item = &'e Element>, depth: usize) -> String {
        elements
            .map(|e| self.render_element(e, depth))
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_element(&self, element: &Element, depth: usize) -> String {
        match &element.kind {
            ElementKind::Text(props) => render_text(element, props),
            ElementKind::Button(props) => render_button(element, props),
            ElementKind::Image(props) => self.render_image(element, props),
            ElementKind::Divider(props) => render_divider(element, props),
            ElementKind::Spacer(props) => render_spacer(element, props),
            ElementKind::Header => HEADER_PLACEHOLDER.to_string(),
            ElementKind::Footer => FOOTER_PLACEHOLDER.to_string(),
            ElementKind::Columns {
                columns,
                properties,
            } => {
                if self.exceeds_depth(element, depth) {
                    return String::new();
                }
                self.render_columns(element, columns, properties, depth)
            }
            ElementKind::Embed(props) => self.render_embed(element, props),
            ElementKind::Social(props) => render_social(element, props),
            ElementKind::Section {
                children,
                properties,
            } => {
                if self.exceeds_depth(element, depth) {
                    return String::new();
                }
                self.render_section(element, children, properties, depth)
            }
        }
    }

    fn exceeds_depth(&self, element: &Element, depth: usize) -> bool {
        if depth < self.options.max_depth {
            return false;
        }
        self.sink.report(
            Diagnostic::new(
                DiagnosticKind::DepthLimit,
                format!(
                    "{} container at depth {depth} exceeds limit {}",
                    element.element_type(),
                    self.options.max_depth
                ),
            )
            .for_element(element.id.as_str()),
        );
        true
    }

    fn render_columns(
        &self,
        element: &Element,
        columns: &ColumnPair,
        props: &ColumnsProperties,
        depth: usize,
    ) -> String {
        let gap = half_length(props.gap.as_deref().unwrap_or("20px"));
        let cell = |children: &[Element]| {
            if children.is_empty() {
                EMPTY_COLUMN.to_string()
            } else {
                self.render_list(children.iter(), depth + 1)
            }
        };

        let mut left_style = InlineStyle::new();
        left_style.set("vertical-align", "top").set("padding-right", &gap);
        let mut right_style = InlineStyle::new();
        right_style.set("vertical-align", "top").set("padding-left", &gap);

        format!(
            "<table {TABLE_ATTRS}{outer}><tr><td width=\"50%\"{left_style}>{left}</td><td width=\"50%\"{right_style}>{right}</td></tr></table>",
            outer = InlineStyle::from_styles(&element.styles).attribute(),
            left_style = left_style.attribute(),
            left = cell(columns.left()),
            right_style = right_style.attribute(),
            right = cell(columns.right()),
        )
    }

    fn render_section(
        &self,
        element: &Element,
        children: &[Element],
        props: &SectionProperties,
        depth: usize,
    ) -> String {
        let mut table_style = InlineStyle::new();
        table_style.set_opt("background-color", props.background_color.as_deref());
        let mut cell_style = InlineStyle::from_styles(&element.styles);
        cell_style.set_opt("padding", props.padding.as_deref());

        format!(
            "<table {TABLE_ATTRS}{}><tr><td{}>{}</td></tr></table>",
            table_style.attribute(),
            cell_style.attribute(),
            self.render_list(children.iter(), depth + 1)
        )
    }

    fn render_image(&self, element: &Element, props: &ImageProperties) -> String {
        let src = if is_usable_image_source(&props.src) {
            props.src.trim()
        } else {
            self.sink.report(
                Diagnostic::new(
                    DiagnosticKind::ImageFallback,
                    format!("unusable image source {:?}, using placeholder", props.src),
                )
                .for_element(element.id.as_str()),
            );
            PLACEHOLDER_IMAGE
        };

        let mut img_style = InlineStyle::new();
        img_style
            .set("display", "block")
            .set("max-width", "100%")
            .set_opt("width", props.width.as_deref())
            .set_opt("height", props.height.as_deref())
            .set("border", "0");
        let alignment = alignment_or(props.alignment, Alignment::Center);
        if alignment == "center" {
            img_style.set("margin", "0 auto");
        }

        let mut img = format!(
            "<img src=\"{}\" alt=\"{}\"{}>",
            escape_html(src),
            escape_html(&props.alt),
            img_style.attribute()
        );
        if let Some(link) = props.link.as_deref().filter(|l| !l.trim().is_empty()) {
            img = format!("<a href=\"{}\">{img}</a>", escape_html(link.trim()));
        }

        let mut wrapper = InlineStyle::from_styles(&element.styles);
        wrapper.set("text-align", alignment);
        format!("<div{}>{img}</div>", wrapper.attribute())
    }

    fn render_embed(&self, element: &Element, props: &EmbedProperties) -> String {
        let fragment = match props.kind {
            EmbedKind::Html => non_empty(&props.html).map(str::to_string),
            EmbedKind::Script => {
                non_empty(&props.script).map(|script| format!("<script>{script}</script>"))
            }
            EmbedKind::Iframe => non_empty(&props.url).map(|url| {
                format!(
                    "<iframe src=\"{}\" width=\"100%\" height=\"{}\" title=\"{}\" frameborder=\"0\" style=\"border: 0;\"></iframe>",
                    escape_html(url),
                    escape_html(props.height.as_deref().unwrap_or("400")),
                    escape_html(props.title.as_deref().unwrap_or("Embedded content"))
                )
            }),
            EmbedKind::Video => non_empty(&props.url).map(|url| video_fragment(url, props)),
            EmbedKind::Social => non_empty(&props.url).map(|url| {
                format!(
                    "<div style=\"border: 1px solid #e1e8ed; border-radius: 8px; padding: 16px; font-family: Arial, sans-serif;\"><a href=\"{}\" style=\"color: #1da1f2; text-decoration: none;\">{}</a></div>",
                    escape_html(url),
                    escape_html(props.title.as_deref().unwrap_or("View post"))
                )
            }),
        };

        let inner = fragment.unwrap_or_else(|| {
            self.sink.report(
                Diagnostic::new(
                    DiagnosticKind::EmbedFallback,
                    format!("{} embed has no content, using fallback text", props.kind.as_str()),
                )
                .for_element(element.id.as_str()),
            );
            format!(
                "<p style=\"color: #666666; font-style: italic;\">{}</p>",
                escape_html(
                    props
                        .fallback_text
                        .as_deref()
                        .unwrap_or(DEFAULT_EMBED_FALLBACK)
                )
            )
        });

        format!(
            "<div{}>{inner}</div>",
            InlineStyle::from_styles(&element.styles).attribute()
        )
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn video_fragment(url: &str, props: &EmbedProperties) -> String {
    let title = props.title.as_deref().unwrap_or("Watch video");
    match youtube_video_id(url) {
        Some(id) => format!(
            "<a href=\"{}\"><img src=\"https://img.youtube.com/vi/{id}/hqdefault.jpg\" alt=\"{}\" style=\"display: block; max-width: 100%; width: 100%; border: 0;\"></a>",
            escape_html(url),
            escape_html(title)
        ),
        None => format!(
            "<a href=\"{}\" style=\"display: block; padding: 40px 20px; background-color: #000000; color: #ffffff; text-align: center; text-decoration: none; font-family: Arial, sans-serif;\">&#9654; {}</a>",
            escape_html(url),
            escape_html(title)
        ),
    }
}

fn render_text(element: &Element, props: &TextProperties) -> String {
    let mut style = InlineStyle::from_styles(&element.styles);
    style
        .set_opt("font-size", props.font_size.as_deref())
        .set_opt("font-family", props.font_family.as_deref())
        .set_opt("color", props.color.as_deref())
        .set_opt("text-align", props.text_align.map(|a| a.as_str()))
        .set_opt("font-weight", props.font_weight.as_deref())
        .set_opt("line-height", props.line_height.as_deref());

    format!(
        "<div{}>{}</div>",
        style.attribute(),
        compile_markup(&element.content)
    )
}

fn render_button(element: &Element, props: &ButtonProperties) -> String {
    let mut link = InlineStyle::new();
    link.set("display", "inline-block")
        .set(
            "background-color",
            props.color.as_deref().unwrap_or("#007bff"),
        )
        .set("color", props.text_color.as_deref().unwrap_or("#ffffff"))
        .set("font-size", props.font_size.as_deref().unwrap_or("16px"))
        .set(
            "font-family",
            props.font_family.as_deref().unwrap_or("Arial, sans-serif"),
        )
        .set("padding", props.padding.as_deref().unwrap_or("12px 24px"))
        .set("width", props.width.as_deref().unwrap_or("auto"))
        .set_opt("border-radius", props.border_radius.as_deref())
        .set("text-decoration", "none");

    let alignment = alignment_or(props.alignment, Alignment::Center);
    let mut cell = InlineStyle::from_styles(&element.styles);
    cell.set_default("padding", "10px 0");

    let url = if props.url.trim().is_empty() {
        "#"
    } else {
        props.url.trim()
    };

    format!(
        "<table {TABLE_ATTRS}><tr><td align=\"{alignment}\"{}><a href=\"{}\"{}>{}</a></td></tr></table>",
        cell.attribute(),
        escape_html(url),
        link.attribute(),
        escape_html(&props.text)
    )
}

fn render_divider(element: &Element, props: &DividerProperties) -> String {
    let border = format!(
        "{} {} {}",
        props.thickness.as_deref().unwrap_or("1px"),
        props.style.as_deref().unwrap_or("solid"),
        props.color.as_deref().unwrap_or("#dddddd")
    );
    let mut style = InlineStyle::from_styles(&element.styles);
    style
        .set("border", "none")
        .set("border-top", &border)
        .set(
            "margin",
            &format!("{} 0", props.margin.as_deref().unwrap_or("20px")),
        );
    format!("<hr{}>", style.attribute())
}

fn render_spacer(element: &Element, props: &SpacerProperties) -> String {
    let height = props.height.as_deref().unwrap_or("20px");
    let mut style = InlineStyle::from_styles(&element.styles);
    style
        .set("height", height)
        .set("line-height", height)
        .set("font-size", "1px");
    format!("<div{}>&nbsp;</div>", style.attribute())
}

fn render_social(element: &Element, props: &SocialProperties) -> String {
    let mut link_style = InlineStyle::new();
    link_style
        .set("display", "inline-block")
        .set("margin", "0 8px")
        .set("color", "#007bff")
        .set("text-decoration", "none")
        .set("font-size", props.font_size.as_deref().unwrap_or("14px"));
    let link_style = link_style.attribute();

    let links: String = props
        .links
        .iter()
        .filter(|link| !link.url.trim().is_empty())
        .map(|link| {
            format!(
                "<a href=\"{}\"{link_style}>{}</a>",
                escape_html(link.url.trim()),
                escape_html(&link.display_name())
            )
        })
        .collect();

    let mut wrapper = InlineStyle::from_styles(&element.styles);
    wrapper
        .set(
            "text-align",
            alignment_or(props.alignment, Alignment::Center),
        )
        .set_default("padding", "10px 0");
    format!("<div{}>{links}</div>", wrapper.attribute())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};
    use crate::document::{ColumnSide, ElementType};

    fn render_one(element: &Element, sink: &dyn DiagnosticSink) -> String {
        let options = RenderOptions::default();
        Renderer::new(&options, sink).render_element(element, 0)
    }

    #[test]
    fn test_image_source_schemes() {
        assert!(is_usable_image_source("https://cdn.test/a.png"));
        assert!(is_usable_image_source("HTTP://cdn.test/a.png"));
        assert!(is_usable_image_source("data:image/png;base64,AAAA"));
        assert!(is_usable_image_source("cid:logo"));
        assert!(!is_usable_image_source(""));
        assert!(!is_usable_image_source("https://"));
        assert!(!is_usable_image_source("javascript:alert(1)"));
        assert!(!is_usable_image_source("/relative/a.png"));
    }

    #[test]
    fn test_youtube_ids() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_video_id("https://youtube.com/embed/dQw4w9WgXcQ?rel=0"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_video_id("https://vimeo.com/123"), None);
        assert_eq!(youtube_video_id("https://youtube.com/watch?list=x"), None);
    }

    #[test]
    fn test_text_properties_override_styles() {
        let element = Element::new(ElementType::Text)
            .with_content("Hi *there*")
            .with_style("color", "red")
            .with_style("margin", "0");
        let html = render_one(&element, &NullSink);
        assert!(html.contains("color: #333333;"));
        assert!(!html.contains("color: red"));
        assert!(html.contains("margin: 0;"));
        assert!(html.contains("<p>Hi <em>there</em></p>"));
    }

    #[test]
    fn test_button_defaults_when_properties_missing() {
        let element = Element::with_kind(ElementKind::Button(ButtonProperties {
            text: "Go & see".into(),
            url: "https://shop.test/?a=1&b=2".into(),
            ..Default::default()
        }));
        let html = render_one(&element, &NullSink);
        assert!(html.contains("background-color: #007bff;"));
        assert!(html.contains("color: #ffffff;"));
        assert!(html.contains("padding: 12px 24px;"));
        assert!(html.contains("align=\"center\""));
        assert!(html.contains("href=\"https://shop.test/?a=1&amp;b=2\""));
        assert!(html.contains(">Go &amp; see</a>"));
    }

    #[test]
    fn test_image_placeholder_reported() {
        let element = Element::with_kind(ElementKind::Image(ImageProperties {
            src: "not a url".into(),
            alt: "Logo".into(),
            ..Default::default()
        }));
        let sink = CollectingSink::new();
        let html = render_one(&element, &sink);
        assert!(html.contains(PLACEHOLDER_IMAGE));
        assert!(html.contains("alt=\"Logo\""));
        assert_eq!(sink.count(DiagnosticKind::ImageFallback), 1);
        assert_eq!(
            sink.diagnostics()[0].element_id.as_deref(),
            Some(element.id.as_str())
        );
    }

    #[test]
    fn test_image_link_wraps() {
        let element = Element::with_kind(ElementKind::Image(ImageProperties {
            src: "https://cdn.test/a.png".into(),
            link: Some("https://shop.test".into()),
            ..Default::default()
        }));
        let html = render_one(&element, &NullSink);
        assert!(html.contains("<a href=\"https://shop.test\"><img src=\"https://cdn.test/a.png\""));
    }

    #[test]
    fn test_empty_columns_show_drop_placeholder() {
        let mut columns = ColumnPair::new();
        columns.push(ColumnSide::Left, Element::new(ElementType::Divider));
        let element = Element::with_kind(ElementKind::Columns {
            columns,
            properties: ColumnsProperties::default(),
        });
        let html = render_one(&element, &NullSink);
        assert_eq!(html.matches("Drop elements here").count(), 1);
        assert!(html.contains("padding-right: 10px;"));
        let hr = html.find("<hr").unwrap();
        let drop = html.find("Drop elements here").unwrap();
        assert!(hr < drop);
    }

    #[test]
    fn test_embed_fallbacks() {
        for kind in [
            EmbedKind::Html,
            EmbedKind::Script,
            EmbedKind::Iframe,
            EmbedKind::Video,
            EmbedKind::Social,
        ] {
            let element = Element::with_kind(ElementKind::Embed(EmbedProperties {
                kind,
                fallback_text: Some("See it online".into()),
                ..Default::default()
            }));
            let sink = CollectingSink::new();
            let html = render_one(&element, &sink);
            assert!(html.contains("See it online"), "{kind:?}");
            assert_eq!(sink.count(DiagnosticKind::EmbedFallback), 1);
        }
    }

    #[test]
    fn test_embed_kinds() {
        let embed = |props: EmbedProperties| {
            render_one(&Element::with_kind(ElementKind::Embed(props)), &NullSink)
        };

        let html = embed(EmbedProperties {
            html: "<b>raw</b>".into(),
            ..Default::default()
        });
        assert!(html.contains("<b>raw</b>"));

        let iframe = embed(EmbedProperties {
            kind: EmbedKind::Iframe,
            url: "https://maps.test".into(),
            height: Some("300".into()),
            ..Default::default()
        });
        assert!(iframe.contains("<iframe src=\"https://maps.test\""));
        assert!(iframe.contains("height=\"300\""));

        let video = embed(EmbedProperties {
            kind: EmbedKind::Video,
            url: "https://youtu.be/abc123".into(),
            ..Default::default()
        });
        assert!(video.contains("https://img.youtube.com/vi/abc123/hqdefault.jpg"));

        let other_video = embed(EmbedProperties {
            kind: EmbedKind::Video,
            url: "https://vimeo.com/1".into(),
            title: Some("Launch".into()),
            ..Default::default()
        });
        assert!(other_video.contains("&#9654; Launch"));
    }

    #[test]
    fn test_social_links() {
        let html = render_one(&Element::new(ElementType::Social), &NullSink);
        assert!(html.contains(">Facebook</a>"));
        assert!(html.contains(">Instagram</a>"));
        assert!(html.contains("text-align: center;"));
    }
}
