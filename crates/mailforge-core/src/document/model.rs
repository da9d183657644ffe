//! Email document data model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::column::ColumnPair;
use super::properties::{
    ButtonProperties, ColumnsProperties, DividerProperties, EmbedProperties, ImageProperties,
    SectionProperties, SocialProperties, SpacerProperties, TextProperties,
};
use crate::error::ValidationError;

/// Default layout width in pixels.
pub const DEFAULT_WIDTH: u32 = 600;

/// Unique element identifier within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// String form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Element type tag, as used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Markup text block.
    Text,
    /// Call-to-action button.
    Button,
    /// Image.
    Image,
    /// Horizontal rule.
    Divider,
    /// Vertical whitespace.
    Spacer,
    /// Branding header slot.
    Header,
    /// Branding footer slot.
    Footer,
    /// Two-column container.
    Columns,
    /// Embedded external content.
    Embed,
    /// Row of social links.
    Social,
    /// Generic section container.
    Section,
}

impl ElementType {
    /// Every element type, in palette order.
    pub const ALL: [Self; 11] = [
        Self::Text,
        Self::Button,
        Self::Image,
        Self::Divider,
        Self::Spacer,
        Self::Header,
        Self::Footer,
        Self::Columns,
        Self::Embed,
        Self::Social,
        Self::Section,
    ];

    /// Parse from wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Button => "button",
            Self::Image => "image",
            Self::Divider => "divider",
            Self::Spacer => "spacer",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Columns => "columns",
            Self::Embed => "embed",
            Self::Social => "social",
            Self::Section => "section",
        }
    }

    /// Whether elements of this type hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Columns | Self::Section)
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownElementType(s.to_string()))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Markup text block.
    Text(TextProperties),
    /// Call-to-action button.
    Button(ButtonProperties),
    /// Image.
    Image(ImageProperties),
    /// Horizontal rule.
    Divider(DividerProperties),
    /// Vertical whitespace.
    Spacer(SpacerProperties),
    /// Branding header slot, filled in by the caller.
    Header,
    /// Branding footer slot, filled in by the caller.
    Footer,
    /// Two-column container.
    Columns {
        /// Column contents.
        columns: ColumnPair,
        /// Layout properties.
        properties: ColumnsProperties,
    },
    /// Embedded external content.
    Embed(EmbedProperties),
    /// Row of social links.
    Social(SocialProperties),
    /// Generic section container.
    Section {
        /// Ordered children.
        children: Vec<Element>,
        /// Layout properties.
        properties: SectionProperties,
    },
}

impl ElementKind {
    /// Type tag of this payload.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Button(_) => ElementType::Button,
            Self::Image(_) => ElementType::Image,
            Self::Divider(_) => ElementType::Divider,
            Self::Spacer(_) => ElementType::Spacer,
            Self::Header => ElementType::Header,
            Self::Footer => ElementType::Footer,
            Self::Columns { .. } => ElementType::Columns,
            Self::Embed(_) => ElementType::Embed,
            Self::Social(_) => ElementType::Social,
            Self::Section { .. } => ElementType::Section,
        }
    }
}

/// A node of the email document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Identifier, unique within the document.
    pub id: ElementId,
    /// Markup source for text-like elements.
    pub content: String,
    /// Raw CSS declarations applied to the element wrapper.
    pub styles: BTreeMap<String, String>,
    /// Type-specific payload.
    pub kind: ElementKind,
}

impl Element {
    /// Creates an element of the given type with its default payload.
    #[must_use]
    pub fn new(element_type: ElementType) -> Self {
        Self::with_kind(element_type.default_kind()).with_content(element_type.default_content())
    }

    /// Creates an element with an explicit payload and empty content.
    #[must_use]
    pub fn with_kind(kind: ElementKind) -> Self {
        Self {
            id: ElementId::generate(),
            content: String::new(),
            styles: BTreeMap::new(),
            kind,
        }
    }

    /// Replaces the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Adds one CSS declaration.
    #[must_use]
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    /// Type tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this element holds children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.element_type().is_container()
    }

    /// Direct children in flat order; empty for non-containers.
    #[must_use]
    pub fn children(&self) -> Vec<&Element> {
        match &self.kind {
            ElementKind::Columns { columns, .. } => columns.iter().map(|(_, e)| e).collect(),
            ElementKind::Section { children, .. } => children.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Finds this element or a descendant by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        if self.id.as_str() == id {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.find(id))
    }

    /// Mutable direct child by id.
    pub fn child_mut(&mut self, id: &str) -> Option<&mut Self> {
        match &mut self.kind {
            ElementKind::Columns { columns, .. } => columns.get_mut(id),
            ElementKind::Section { children, .. } => {
                children.iter_mut().find(|c| c.id.as_str() == id)
            }
            _ => None,
        }
    }

    /// Number of elements in this subtree, including itself.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Self::subtree_len)
            .sum::<usize>()
    }

    /// Visits this element and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Root aggregate: subject, ordered top-level elements and layout width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Top-level elements in display order.
    #[serde(default, deserialize_with = "super::codec::deserialize_elements")]
    pub elements: Vec<Element>,
    /// Layout width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
}

const fn default_width() -> u32 {
    DEFAULT_WIDTH
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with the default width.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subject: String::new(),
            elements: Vec::new(),
            width: DEFAULT_WIDTH,
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Returns true if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements including nested children.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(Element::subtree_len).sum()
    }

    /// Finds an element anywhere in the tree.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find_map(|e| e.find(id))
    }

    /// Returns true if every element id in the tree is distinct.
    #[must_use]
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        let mut unique = true;
        for element in &self.elements {
            element.walk(&mut |e| unique &= seen.insert(e.id.as_str()));
        }
        unique
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::ColumnSide;

    #[test]
    fn test_element_type_parse() {
        assert_eq!(ElementType::parse("columns"), Some(ElementType::Columns));
        assert_eq!(ElementType::parse(" Text "), Some(ElementType::Text));
        assert_eq!(ElementType::parse("carousel"), None);
        assert!("carousel".parse::<ElementType>().is_err());
        for t in ElementType::ALL {
            assert_eq!(ElementType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = Element::new(ElementType::Text);
        let b = Element::new(ElementType::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_find_nested() {
        let child = Element::new(ElementType::Image);
        let child_id = child.id.clone();
        let mut columns = ColumnPair::new();
        columns.push(ColumnSide::Right, child);
        let container = Element::with_kind(ElementKind::Columns {
            columns,
            properties: ColumnsProperties::default(),
        });

        let mut doc = Document::new();
        doc.elements.push(Element::new(ElementType::Text));
        doc.elements.push(container);

        assert_eq!(
            doc.find(child_id.as_str()).map(Element::element_type),
            Some(ElementType::Image)
        );
        assert_eq!(doc.element_count(), 3);
        assert!(doc.has_unique_ids());
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let mut doc = Document::new();
        let first = Element::new(ElementType::Text);
        let mut second = Element::new(ElementType::Button);
        second.id = first.id.clone();
        doc.elements.push(first);
        doc.elements.push(second);
        assert!(!doc.has_unique_ids());
    }
}
