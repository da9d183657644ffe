//! Plain text companion of the rendered email.

use mailforge_markup::to_plain_text;

use crate::document::{Element, ElementKind, EmbedKind, EmbedProperties};

/// Renders elements as plain text blocks separated by one blank line.
///
/// Containers past `max_depth` are dropped silently; the HTML pass has
/// already reported them.
pub(crate) fn render_text(elements: &[Element], max_depth: usize) -> String {
    let mut blocks = Vec::new();
    for element in elements {
        collect_blocks(element, 0, max_depth, &mut blocks);
    }
    blocks.join("\n\n")
}

fn collect_blocks(element: &Element, depth: usize, max_depth: usize, blocks: &mut Vec<String>) {
    let block = match &element.kind {
        ElementKind::Text(_) => to_plain_text(&element.content),
        ElementKind::Button(props) => {
            let text = props.text.trim();
            let url = props.url.trim();
            match (text.is_empty(), url.is_empty()) {
                (_, true) => text.to_string(),
                (true, false) => url.to_string(),
                (false, false) => format!("{text}: {url}"),
            }
        }
        ElementKind::Image(props) => format!("[Image: {}]", props.alt.trim()),
        ElementKind::Divider(_) => "---".to_string(),
        ElementKind::Spacer(_) | ElementKind::Header | ElementKind::Footer => String::new(),
        ElementKind::Columns { columns, .. } => {
            if depth < max_depth {
                for child in columns.left().iter().chain(columns.right()) {
                    collect_blocks(child, depth + 1, max_depth, blocks);
                }
            }
            return;
        }
        ElementKind::Section { children, .. } => {
            if depth < max_depth {
                for child in children {
                    collect_blocks(child, depth + 1, max_depth, blocks);
                }
            }
            return;
        }
        ElementKind::Embed(props) => embed_text(props),
        ElementKind::Social(props) => props
            .links
            .iter()
            .filter(|link| !link.url.trim().is_empty())
            .map(|link| format!("{}: {}", link.display_name(), link.url.trim()))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
}

fn embed_text(props: &EmbedProperties) -> String {
    let fallback = props.fallback_text.clone().unwrap_or_default();
    match props.kind {
        EmbedKind::Html | EmbedKind::Script => fallback,
        EmbedKind::Iframe | EmbedKind::Video | EmbedKind::Social => {
            let url = props.url.trim();
            if url.is_empty() {
                return fallback;
            }
            match props.title.as_deref().map(str::trim) {
                Some(title) if !title.is_empty() => format!("{title}: {url}"),
                _ => url.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ButtonProperties, ElementType};

    #[test]
    fn test_leaf_blocks() {
        let elements = vec![
            Element::new(ElementType::Text).with_content("Hello *world*"),
            Element::new(ElementType::Spacer),
            Element::new(ElementType::Image),
            Element::new(ElementType::Header),
            Element::with_kind(ElementKind::Button(ButtonProperties {
                text: "Shop".into(),
                ..Default::default()
            })),
        ];
        assert_eq!(render_text(&elements, 6), "Hello world\n\n[Image: Image]\n\nShop");
    }

    #[test]
    fn test_social_and_embed() {
        let elements = vec![
            Element::new(ElementType::Social),
            Element::with_kind(ElementKind::Embed(EmbedProperties {
                kind: EmbedKind::Video,
                url: "https://youtu.be/x".into(),
                title: Some("Launch".into()),
                ..Default::default()
            })),
        ];
        assert_eq!(
            render_text(&elements, 6),
            "Facebook: https://facebook.com\nTwitter: https://twitter.com\nInstagram: https://instagram.com\n\nLaunch: https://youtu.be/x"
        );
    }
}
