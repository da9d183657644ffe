//! Per-type defaults for newly created elements.

use super::column::ColumnPair;
use super::model::{ElementKind, ElementType};
use super::properties::{
    Alignment, ButtonProperties, ColumnsProperties, DividerProperties, EmbedProperties,
    ImageProperties, SectionProperties, SocialLink, SocialProperties, SpacerProperties,
    TextProperties,
};

/// Image shown when an image element has no usable source.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x200?text=Image";

impl ElementType {
    /// Default content for a new element of this type.
    #[must_use]
    pub const fn default_content(self) -> &'static str {
        match self {
            Self::Text => "Enter your text here",
            _ => "",
        }
    }

    /// Default payload for a new element of this type.
    #[must_use]
    pub fn default_kind(self) -> ElementKind {
        match self {
            Self::Text => ElementKind::Text(TextProperties {
                font_size: Some("16px".into()),
                font_family: Some("Arial, sans-serif".into()),
                color: Some("#333333".into()),
                text_align: Some(Alignment::Left),
                font_weight: None,
                line_height: Some("1.5".into()),
            }),
            Self::Button => ElementKind::Button(ButtonProperties {
                text: "Click Here".into(),
                url: "https://example.com".into(),
                color: Some("#007bff".into()),
                text_color: Some("#ffffff".into()),
                font_size: Some("16px".into()),
                font_family: Some("Arial, sans-serif".into()),
                padding: Some("12px 24px".into()),
                width: Some("auto".into()),
                alignment: Some(Alignment::Center),
                border_radius: Some("4px".into()),
            }),
            Self::Image => ElementKind::Image(ImageProperties {
                src: PLACEHOLDER_IMAGE.into(),
                alt: "Image".into(),
                width: Some("100%".into()),
                height: None,
                link: None,
                alignment: Some(Alignment::Center),
            }),
            Self::Divider => ElementKind::Divider(DividerProperties {
                color: Some("#dddddd".into()),
                thickness: Some("1px".into()),
                style: Some("solid".into()),
                margin: Some("20px".into()),
            }),
            Self::Spacer => ElementKind::Spacer(SpacerProperties {
                height: Some("20px".into()),
            }),
            Self::Header => ElementKind::Header,
            Self::Footer => ElementKind::Footer,
            Self::Columns => ElementKind::Columns {
                columns: ColumnPair::new(),
                properties: ColumnsProperties {
                    gap: Some("20px".into()),
                },
            },
            Self::Embed => ElementKind::Embed(EmbedProperties::default()),
            Self::Social => ElementKind::Social(SocialProperties {
                links: vec![
                    SocialLink::new("facebook", "https://facebook.com"),
                    SocialLink::new("twitter", "https://twitter.com"),
                    SocialLink::new("instagram", "https://instagram.com"),
                ],
                alignment: Some(Alignment::Center),
                font_size: Some("14px".into()),
            }),
            Self::Section => ElementKind::Section {
                children: Vec::new(),
                properties: SectionProperties {
                    background_color: Some("#ffffff".into()),
                    padding: Some("20px".into()),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    #[test]
    fn test_every_type_defaults_to_itself() {
        for element_type in ElementType::ALL {
            let element = Element::new(element_type);
            assert_eq!(element.element_type(), element_type);
            assert!(element.children().is_empty());
        }
    }

    #[test]
    fn test_text_default_content() {
        assert_eq!(Element::new(ElementType::Text).content, "Enter your text here");
        assert!(Element::new(ElementType::Spacer).content.is_empty());
    }

    #[test]
    fn test_button_defaults() {
        let ElementKind::Button(props) = ElementType::Button.default_kind() else {
            panic!("button default is not a button");
        };
        assert_eq!(props.color.as_deref(), Some("#007bff"));
        assert_eq!(props.alignment, Some(Alignment::Center));
    }
}
