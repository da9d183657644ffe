//! Wire schema for persisted elements.
//!
//! Elements persist as `{ id, type, content, styles, properties, children }`
//! with camelCase property keys. A columns container stores its children as
//! one flat array alternating left/right; `null` marks a hole where the
//! shorter column has no element, which keeps every child's parity intact.
//!
//! Decoding is lenient: properties that do not fit the element type fall
//! back to the type defaults, and elements of unknown type are skipped when
//! they appear inside a list.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use super::column::ColumnPair;
use super::model::{Element, ElementId, ElementKind, ElementType};
use crate::error::ValidationError;

/// Persisted form of an [`Element`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawElement {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    styles: BTreeMap<String, String>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    children: Vec<Option<RawElement>>,
}

/// Serializes typed properties into a JSON object.
pub(crate) fn properties_to_map<T: Serialize>(properties: &T) -> Map<String, Value> {
    match serde_json::to_value(properties) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Decodes typed properties, falling back to the type's factory defaults.
fn properties_or_default<T>(properties: Map<String, Value>, element_type: ElementType) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_value(Value::Object(properties)).unwrap_or_else(|e| {
        warn!("Invalid {element_type} properties, using defaults: {e}");
        let defaults = kind_properties(&element_type.default_kind());
        serde_json::from_value(Value::Object(defaults)).unwrap_or_default()
    })
}

/// Properties object of a payload.
pub(crate) fn kind_properties(kind: &ElementKind) -> Map<String, Value> {
    match kind {
        ElementKind::Text(p) => properties_to_map(p),
        ElementKind::Button(p) => properties_to_map(p),
        ElementKind::Image(p) => properties_to_map(p),
        ElementKind::Divider(p) => properties_to_map(p),
        ElementKind::Spacer(p) => properties_to_map(p),
        ElementKind::Header | ElementKind::Footer => Map::new(),
        ElementKind::Columns { properties, .. } => properties_to_map(properties),
        ElementKind::Embed(p) => properties_to_map(p),
        ElementKind::Social(p) => properties_to_map(p),
        ElementKind::Section { properties, .. } => properties_to_map(properties),
    }
}

impl From<&Element> for RawElement {
    fn from(element: &Element) -> Self {
        let children = match &element.kind {
            ElementKind::Columns { columns, .. } => columns
                .to_flat()
                .into_iter()
                .map(|slot| slot.map(Self::from))
                .collect(),
            ElementKind::Section { children, .. } => {
                children.iter().map(|c| Some(Self::from(c))).collect()
            }
            _ => Vec::new(),
        };

        Self {
            id: element.id.to_string(),
            element_type: element.element_type().as_str().to_string(),
            content: element.content.clone(),
            styles: element.styles.clone(),
            properties: kind_properties(&element.kind),
            children,
        }
    }
}

/// Decodes a child, logging and dropping it when its type is unknown.
fn decode_child(raw: RawElement) -> Option<Element> {
    Element::try_from(raw)
        .map_err(|e| warn!("Skipping undecodable element: {e}"))
        .ok()
}

impl TryFrom<RawElement> for Element {
    type Error = ValidationError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let element_type = ElementType::parse(&raw.element_type)
            .ok_or_else(|| ValidationError::UnknownElementType(raw.element_type.clone()))?;

        if !element_type.is_container() && !raw.children.is_empty() {
            warn!("Ignoring children of non-container {element_type} element");
        }

        let properties = raw.properties;
        let kind = match element_type {
            ElementType::Text => ElementKind::Text(properties_or_default(properties, element_type)),
            ElementType::Button => {
                ElementKind::Button(properties_or_default(properties, element_type))
            }
            ElementType::Image => {
                ElementKind::Image(properties_or_default(properties, element_type))
            }
            ElementType::Divider => {
                ElementKind::Divider(properties_or_default(properties, element_type))
            }
            ElementType::Spacer => {
                ElementKind::Spacer(properties_or_default(properties, element_type))
            }
            ElementType::Header => ElementKind::Header,
            ElementType::Footer => ElementKind::Footer,
            ElementType::Columns => ElementKind::Columns {
                // An undecodable child becomes a hole so its siblings keep their column.
                columns: ColumnPair::from_flat(
                    raw.children
                        .into_iter()
                        .map(|slot| slot.and_then(decode_child))
                        .collect(),
                ),
                properties: properties_or_default(properties, element_type),
            },
            ElementType::Embed => {
                ElementKind::Embed(properties_or_default(properties, element_type))
            }
            ElementType::Social => {
                ElementKind::Social(properties_or_default(properties, element_type))
            }
            ElementType::Section => ElementKind::Section {
                children: raw
                    .children
                    .into_iter()
                    .flatten()
                    .filter_map(decode_child)
                    .collect(),
                properties: properties_or_default(properties, element_type),
            },
        };

        let id = if raw.id.trim().is_empty() {
            ElementId::generate()
        } else {
            ElementId::from(raw.id)
        };

        Ok(Self {
            id,
            content: raw.content,
            styles: raw.styles,
            kind,
        })
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawElement::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawElement::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Deserializes an element list, skipping elements of unknown type.
///
/// # Errors
///
/// Returns an error only if the input is not a list of element objects.
pub fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawElement> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().filter_map(decode_child).collect())
}
