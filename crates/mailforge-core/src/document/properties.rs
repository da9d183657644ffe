//! Typed per-element properties.
//!
//! Every optional field falls back to a renderer default when absent, so a
//! partially filled property set is always renderable.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified (text only).
    Justify,
}

impl Alignment {
    /// Parse from a CSS / HTML attribute value, defaulting to left.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "center" | "middle" => Self::Center,
            "right" => Self::Right,
            "justify" => Self::Justify,
            _ => Self::Left,
        }
    }

    /// CSS value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// Properties of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProperties {
    /// CSS font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// CSS font family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Text colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<Alignment>,
    /// CSS font weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// CSS line height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
}

/// Properties of a call-to-action button.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonProperties {
    /// Label.
    pub text: String,
    /// Link target.
    pub url: String,
    /// Background colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// CSS font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// CSS font family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// CSS padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    /// CSS width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Horizontal placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// CSS border radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

/// Properties of an image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageProperties {
    /// Image URL.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Width attribute / CSS width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height attribute / CSS height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Optional link wrapped around the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Horizontal placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

/// Properties of a horizontal rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerProperties {
    /// Line colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line thickness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<String>,
    /// CSS border style (`solid`, `dashed`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Vertical margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

/// Properties of vertical whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerProperties {
    /// CSS height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// Properties of a two-column container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnsProperties {
    /// Horizontal gap between the columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

/// Properties of a section container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionProperties {
    /// Background colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// CSS padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

/// What an embed element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    /// Raw HTML inserted as-is.
    #[default]
    Html,
    /// Script source (not executed by mail clients).
    Script,
    /// Framed page URL.
    Iframe,
    /// Video URL.
    Video,
    /// Social post URL rendered as a card.
    Social,
}

impl EmbedKind {
    /// Parse from wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known embed kind.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "script" => Ok(Self::Script),
            "iframe" => Ok(Self::Iframe),
            "video" => Ok(Self::Video),
            "social" => Ok(Self::Social),
            _ => Err(ValidationError::UnknownEmbedKind(s.to_string())),
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Script => "script",
            Self::Iframe => "iframe",
            Self::Video => "video",
            Self::Social => "social",
        }
    }
}

/// Properties of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedProperties {
    /// Which field is meaningful.
    #[serde(rename = "embedType")]
    pub kind: EmbedKind,
    /// Raw HTML for [`EmbedKind::Html`].
    pub html: String,
    /// Script source for [`EmbedKind::Script`].
    pub script: String,
    /// URL for the iframe, video and social kinds.
    pub url: String,
    /// Caption / link label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Frame height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Text shown when the relevant field is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_text: Option<String>,
}

/// One social profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name, e.g. `facebook`.
    pub platform: String,
    /// Profile URL.
    pub url: String,
}

impl SocialLink {
    /// Creates a link.
    #[must_use]
    pub fn new(platform: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
        }
    }

    /// Platform name with an upper-case first letter.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut chars = self.platform.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

/// Properties of a row of social links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialProperties {
    /// Links in display order.
    pub links: Vec<SocialLink>,
    /// Horizontal placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Label font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::parse("CENTER"), Alignment::Center);
        assert_eq!(Alignment::parse("middle"), Alignment::Center);
        assert_eq!(Alignment::parse("bogus"), Alignment::Left);
    }

    #[test]
    fn test_embed_kind_parse() {
        assert_eq!(EmbedKind::parse("Video").unwrap(), EmbedKind::Video);
        assert!(EmbedKind::parse("flash").is_err());
    }

    #[test]
    fn test_button_properties_wire_names() {
        let props = ButtonProperties {
            text: "Buy".into(),
            url: "https://shop.example".into(),
            text_color: Some("#fff".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&props).unwrap();
        assert_eq!(value["textColor"], "#fff");
        assert!(value.get("fontSize").is_none());
    }

    #[test]
    fn test_embed_kind_wire_name() {
        let props: EmbedProperties =
            serde_json::from_str(r#"{"embedType":"iframe","url":"https://x.test"}"#).unwrap();
        assert_eq!(props.kind, EmbedKind::Iframe);
        assert!(props.html.is_empty());
    }

    #[test]
    fn test_social_display_name() {
        assert_eq!(SocialLink::new("twitter", "#").display_name(), "Twitter");
        assert_eq!(SocialLink::new("", "#").display_name(), "");
    }
}
