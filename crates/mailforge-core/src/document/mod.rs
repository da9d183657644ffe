//! Email document model.
//!
//! A [`Document`] is an ordered tree of typed [`Element`]s, one level of
//! nesting deep: `columns` and `section` elements hold children, everything
//! else is a leaf.

mod codec;
mod column;
mod factory;
mod model;
mod mutation;
pub mod properties;

pub use codec::deserialize_elements;
pub use column::{ColumnPair, ColumnSide, MoveDirection};
pub use factory::PLACEHOLDER_IMAGE;
pub use model::{DEFAULT_WIDTH, Document, Element, ElementId, ElementKind, ElementType};
pub use mutation::{ElementPatch, InsertTarget};
pub use properties::{
    Alignment, ButtonProperties, ColumnsProperties, DividerProperties, EmbedKind,
    EmbedProperties, ImageProperties, SectionProperties, SocialLink, SocialProperties,
    SpacerProperties, TextProperties,
};
