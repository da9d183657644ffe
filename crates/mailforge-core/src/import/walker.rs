//! Bounded classification walk over the main container.

use std::collections::BTreeMap;

use scraper::ElementRef;

use super::ImportOptions;
use super::inline::{inline_markup, is_skipped, parse_style_attribute, plain_text};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::document::{
    Alignment, ButtonProperties, ColumnPair, ColumnSide, Element, ElementKind, ElementType,
    ImageProperties, TextProperties,
};

/// What a node's class names and tag suggest it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Header,
    ProductGrid,
    ButtonGroup,
    Footer,
    Other,
}

impl Role {
    fn of(element: ElementRef<'_>) -> Self {
        let tag = element.value().name();
        let class = element
            .value()
            .attr("class")
            .unwrap_or_default()
            .to_ascii_lowercase();

        if tag == "header" || class.contains("header") {
            Self::Header
        } else if class.contains("product-grid") || class.contains("products") {
            Self::ProductGrid
        } else if ["button", "btn", "cta"].iter().any(|k| class.contains(k)) {
            Self::ButtonGroup
        } else if tag == "footer" || class.contains("footer") {
            Self::Footer
        } else {
            Self::Other
        }
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

const fn heading_size(level: u8) -> &'static str {
    match level {
        1 => "32px",
        2 => "24px",
        3 => "20px",
        4 => "18px",
        5 => "16px",
        _ => "14px",
    }
}

fn element_styles(element: ElementRef<'_>) -> BTreeMap<String, String> {
    element
        .value()
        .attr("style")
        .map(parse_style_attribute)
        .unwrap_or_default()
}

fn text_element(
    content: String,
    styles: BTreeMap<String, String>,
    adjust: impl FnOnce(&mut TextProperties),
) -> Element {
    let mut element = Element::new(ElementType::Text).with_content(content);
    element.styles = styles;
    if let ElementKind::Text(props) = &mut element.kind {
        adjust(props);
    }
    element
}

fn heading_element(element: ElementRef<'_>, level: u8) -> Option<Element> {
    let content = inline_markup(element);
    (!content.is_empty()).then(|| {
        text_element(content, element_styles(element), |props| {
            props.font_size = Some(heading_size(level).to_string());
            props.font_weight = Some("bold".to_string());
        })
    })
}

fn paragraph_element(element: ElementRef<'_>) -> Option<Element> {
    let content = inline_markup(element);
    (!content.is_empty()).then(|| text_element(content, element_styles(element), |_| {}))
}

fn list_element(element: ElementRef<'_>, ordered: bool) -> Option<Element> {
    let lines: Vec<String> = element
        .child_elements()
        .filter(|li| li.value().name() == "li")
        .map(|li| inline_markup(li).replace('\n', " "))
        .filter(|item| !item.is_empty())
        .enumerate()
        .map(|(index, item)| {
            if ordered {
                format!("{}. {item}", index + 1)
            } else {
                format!("- {item}")
            }
        })
        .collect();
    (!lines.is_empty()).then(|| text_element(lines.join("\n"), element_styles(element), |_| {}))
}

fn quote_element(element: ElementRef<'_>) -> Option<Element> {
    let content = inline_markup(element);
    (!content.is_empty()).then(|| {
        let quoted = content
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        text_element(quoted, element_styles(element), |_| {})
    })
}

fn pixel_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    let value = element.value().attr(name)?.trim();
    if value.is_empty() {
        None
    } else if value.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("{value}px"))
    } else {
        Some(value.to_string())
    }
}

fn image_element(element: ElementRef<'_>, link: Option<&str>) -> Element {
    let attr = |name| element.value().attr(name).unwrap_or_default().trim().to_string();
    Element::with_kind(ElementKind::Image(ImageProperties {
        src: attr("src"),
        alt: attr("alt"),
        width: pixel_attr(element, "width"),
        height: pixel_attr(element, "height"),
        link: link.map(str::to_string),
        alignment: Some(Alignment::Center),
    }))
}

/// Builds a button from an anchor, or an image when the anchor only wraps
/// an image.
fn anchor_element(anchor: ElementRef<'_>) -> Option<Element> {
    let href = anchor.value().attr("href").map(str::trim).unwrap_or_default();
    let text = plain_text(anchor);

    if text.is_empty() {
        let image = anchor
            .descendent_elements()
            .find(|e| e.value().name() == "img")?;
        return Some(image_element(image, (!href.is_empty()).then_some(href)));
    }

    let styles = element_styles(anchor);
    let ElementKind::Button(defaults) = ElementType::Button.default_kind() else {
        return None;
    };
    let props = ButtonProperties {
        text,
        url: if href.is_empty() { "#".into() } else { href.into() },
        color: styles
            .get("background-color")
            .or_else(|| styles.get("background"))
            .cloned()
            .or(defaults.color),
        text_color: styles.get("color").cloned().or(defaults.text_color),
        ..defaults
    };
    Some(Element::with_kind(ElementKind::Button(props)))
}

/// Walk state: budget counters and diagnostics.
pub(crate) struct Walker<'a> {
    options: &'a ImportOptions,
    sink: &'a dyn DiagnosticSink,
    visited: usize,
    exhausted: bool,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(options: &'a ImportOptions, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            options,
            sink,
            visited: 0,
            exhausted: false,
        }
    }

    /// Imports the children of the main container.
    pub(crate) fn import(&mut self, container: ElementRef<'_>) -> Vec<Element> {
        let mut elements = Vec::new();
        self.visit_children(container, 0, &mut elements);
        elements
    }

    /// Counts one node against the budget. Returns false once the budget is
    /// spent, reporting that the first time.
    fn enter(&mut self, depth: usize) -> bool {
        if self.exhausted {
            return false;
        }
        if self.visited >= self.options.max_nodes {
            self.exhausted = true;
            self.sink.report(Diagnostic::new(
                DiagnosticKind::NodeBudget,
                format!(
                    "stopped after visiting {} nodes; remaining content skipped",
                    self.visited
                ),
            ));
            return false;
        }
        if depth > self.options.max_depth {
            self.sink.report(Diagnostic::new(
                DiagnosticKind::DepthLimit,
                format!(
                    "skipped subtree deeper than {} levels",
                    self.options.max_depth
                ),
            ));
            return false;
        }
        self.visited += 1;
        true
    }

    fn visit_children(&mut self, parent: ElementRef<'_>, depth: usize, out: &mut Vec<Element>) {
        for child in parent.child_elements() {
            if self.exhausted {
                return;
            }
            self.visit(child, depth + 1, out);
        }
    }

    fn visit(&mut self, node: ElementRef<'_>, depth: usize, out: &mut Vec<Element>) {
        let tag = node.value().name();
        if is_skipped(tag) || !self.enter(depth) {
            return;
        }

        match Role::of(node) {
            Role::Header => {
                let content = inline_markup(node);
                if !content.is_empty() {
                    out.push(text_element(content, element_styles(node), |props| {
                        props.font_size = Some("24px".to_string());
                        props.font_weight = Some("bold".to_string());
                        props.text_align = Some(Alignment::Center);
                    }));
                }
            }
            Role::Footer => {
                let content = inline_markup(node);
                if !content.is_empty() {
                    out.push(text_element(content, element_styles(node), |props| {
                        props.font_size = Some("12px".to_string());
                        props.color = Some("#999999".to_string());
                        props.text_align = Some(Alignment::Center);
                    }));
                }
            }
            Role::ProductGrid => self.product_grid(node, depth, out),
            Role::ButtonGroup if tag == "a" => out.extend(anchor_element(node)),
            Role::ButtonGroup => {
                let anchors: Vec<_> = node
                    .descendent_elements()
                    .filter(|e| e.value().name() == "a")
                    .collect();
                if anchors.is_empty() {
                    self.visit_children(node, depth, out);
                } else {
                    out.extend(anchors.into_iter().filter_map(anchor_element));
                }
            }
            Role::Other => self.visit_plain(node, tag, depth, out),
        }
    }

    fn visit_plain(
        &mut self,
        node: ElementRef<'_>,
        tag: &str,
        depth: usize,
        out: &mut Vec<Element>,
    ) {
        if let Some(level) = heading_level(tag) {
            out.extend(heading_element(node, level));
            return;
        }
        match tag {
            "p" => out.extend(paragraph_element(node)),
            "img" => out.push(image_element(node, None)),
            "hr" => out.push(Element::new(ElementType::Divider)),
            "ul" => out.extend(list_element(node, false)),
            "ol" => out.extend(list_element(node, true)),
            "blockquote" => out.extend(quote_element(node)),
            _ => self.visit_children(node, depth, out),
        }
    }

    fn product_grid(&mut self, grid: ElementRef<'_>, depth: usize, out: &mut Vec<Element>) {
        let items: Vec<_> = grid.child_elements().collect();
        if items.is_empty() {
            return;
        }

        let mut per_item = Vec::with_capacity(items.len());
        for item in items {
            if !self.enter(depth + 1) {
                break;
            }
            let mut elements = Vec::new();
            self.product_item(item, depth + 1, &mut elements);
            per_item.push(elements);
        }

        if per_item.len() == 1 {
            out.extend(per_item.into_iter().flatten());
            return;
        }

        let mut columns = ColumnPair::new();
        for (index, elements) in per_item.into_iter().enumerate() {
            let side = ColumnSide::from_flat_index(index);
            for element in elements {
                columns.push(side, element);
            }
        }
        if columns.is_empty() {
            return;
        }
        let ElementKind::Columns { properties, .. } = ElementType::Columns.default_kind() else {
            return;
        };
        out.push(Element::with_kind(ElementKind::Columns {
            columns,
            properties,
        }));
    }

    /// Extracts title, image, description and call-to-action from one
    /// product item, in document order.
    fn product_item(&mut self, node: ElementRef<'_>, depth: usize, out: &mut Vec<Element>) {
        for child in node.child_elements() {
            if !self.enter(depth + 1) {
                return;
            }
            let tag = child.value().name();
            let class = child
                .value()
                .attr("class")
                .unwrap_or_default()
                .to_ascii_lowercase();

            if let Some(level) = heading_level(tag) {
                out.extend(heading_element(child, level.max(3)));
            } else if class.contains("title") || class.contains("name") {
                out.extend(heading_element(child, 3));
            } else if tag == "img" {
                out.push(image_element(child, None));
            } else if tag == "a" {
                out.extend(anchor_element(child));
            } else if tag == "p" || class.contains("description") || class.contains("price") {
                out.extend(paragraph_element(child));
            } else if !is_skipped(tag) {
                self.product_item(child, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::diagnostics::{CollectingSink, DiagnosticKind, NullSink};
    use crate::document::{Document, ElementKind, ElementType};
    use crate::import::{ImportOptions, import_html};

    fn import(raw: &str) -> Document {
        import_html(raw, &ImportOptions::default(), &NullSink)
    }

    fn types(doc: &Document) -> Vec<ElementType> {
        doc.elements.iter().map(|e| e.element_type()).collect()
    }

    #[test]
    fn test_footer_becomes_single_text() {
        let doc = import(r#"<div class="footer">Bye</div>"#);
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].element_type(), ElementType::Text);
        assert_eq!(doc.elements[0].content, "Bye");
    }

    #[test]
    fn test_header_beats_other_roles() {
        let doc = import(r#"<div class="header footer"><h1>Welcome</h1></div>"#);
        assert_eq!(doc.elements.len(), 1);
        let ElementKind::Text(props) = &doc.elements[0].kind else {
            panic!("not text");
        };
        assert_eq!(props.font_size.as_deref(), Some("24px"));
        assert_eq!(doc.elements[0].content, "Welcome");
    }

    #[test]
    fn test_bare_tags() {
        let doc = import(
            r#"<body>
                <h2 style="color: navy">Title</h2>
                <p>Some <b>bold</b> text</p>
                <img src="https://cdn.test/a.png" alt="A" width="300">
                <hr>
                <ul><li>one</li><li>two</li></ul>
                <ol><li>first</li></ol>
                <blockquote>quoted</blockquote>
            </body>"#,
        );
        assert_eq!(
            types(&doc),
            vec![
                ElementType::Text,
                ElementType::Text,
                ElementType::Image,
                ElementType::Divider,
                ElementType::Text,
                ElementType::Text,
                ElementType::Text,
            ]
        );
        assert_eq!(doc.elements[0].styles.get("color").unwrap(), "navy");
        assert_eq!(doc.elements[1].content, "Some **bold** text");
        let ElementKind::Image(image) = &doc.elements[2].kind else {
            panic!("not image");
        };
        assert_eq!(image.src, "https://cdn.test/a.png");
        assert_eq!(image.width.as_deref(), Some("300px"));
        assert_eq!(doc.elements[4].content, "- one\n- two");
        assert_eq!(doc.elements[5].content, "1. first");
        assert_eq!(doc.elements[6].content, "> quoted");
    }

    #[test]
    fn test_button_container_yields_button_per_anchor() {
        let doc = import(
            r#"<div class="cta"><a href="https://a.test">Buy</a> <a href="https://b.test" style="background-color: #ff0000">Sell</a></div>"#,
        );
        assert_eq!(types(&doc), vec![ElementType::Button, ElementType::Button]);
        let ElementKind::Button(second) = &doc.elements[1].kind else {
            panic!("not button");
        };
        assert_eq!(second.text, "Sell");
        assert_eq!(second.url, "https://b.test");
        assert_eq!(second.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_bare_button_anchor() {
        let doc = import(r#"<p>Intro</p><a class="btn" href="https://go.test">Go</a>"#);
        assert_eq!(types(&doc), vec![ElementType::Text, ElementType::Button]);
    }

    #[test]
    fn test_product_grid_alternates_columns() {
        let doc = import(
            r#"<div class="product-grid">
                <div class="product"><img src="https://x.test/1.png" alt="1"><h3>One</h3><p>First</p><a href="https://x.test/1">Buy</a></div>
                <div class="product"><h3>Two</h3></div>
                <div class="product"><h3>Three</h3></div>
            </div>"#,
        );
        assert_eq!(types(&doc), vec![ElementType::Columns]);
        let ElementKind::Columns { columns, .. } = &doc.elements[0].kind else {
            panic!("not columns");
        };
        let left: Vec<_> = columns.left().iter().map(|e| e.element_type()).collect();
        assert_eq!(
            left,
            vec![
                ElementType::Image,
                ElementType::Text,
                ElementType::Text,
                ElementType::Button,
                ElementType::Text,
            ]
        );
        assert_eq!(columns.left()[4].content, "Three");
        assert_eq!(columns.right().len(), 1);
        assert_eq!(columns.right()[0].content, "Two");
    }

    #[test]
    fn test_single_product_is_flattened() {
        let doc = import(
            r#"<div class="products"><div class="item"><h3>Only</h3><a href="https://x.test">Buy</a></div></div>"#,
        );
        assert_eq!(types(&doc), vec![ElementType::Text, ElementType::Button]);
    }

    #[test]
    fn test_unrecognized_content_yields_nothing() {
        assert!(import("<div><span>loose</span><table><tr><td></td></tr></table></div>").is_empty());
    }

    #[test]
    fn test_node_budget_stops_walk() {
        let body: String = (0..20).map(|i| format!("<p>p{i}</p>")).collect();
        let sink = CollectingSink::new();
        let options = ImportOptions {
            max_nodes: 5,
            ..ImportOptions::default()
        };
        let doc = import_html(&body, &options, &sink);
        assert_eq!(doc.elements.len(), 5);
        assert_eq!(sink.count(DiagnosticKind::NodeBudget), 1);
    }

    #[test]
    fn test_depth_limit_skips_deep_subtrees() {
        let deep = format!("{}<p>deep</p>{}", "<div>".repeat(10), "</div>".repeat(10));
        let sink = CollectingSink::new();
        let options = ImportOptions {
            max_depth: 4,
            ..ImportOptions::default()
        };
        let doc = import_html(&format!("<p>top</p>{deep}"), &options, &sink);
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].content, "top");
        assert_eq!(sink.count(DiagnosticKind::DepthLimit), 1);
    }
}
