//! Document mutation operations.
//!
//! Every operation is total: an id that does not exist, or a target that
//! cannot hold the element, leaves the document unchanged and is reported
//! through the return value rather than an error.
//!
//! Nested operations reach exactly one level into a container's children.
//! Inside a columns container they stay within the child's logical column,
//! and deleting a child never moves its siblings to the other column.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::codec::properties_to_map;
use super::column::{ColumnSide, MoveDirection};
use super::model::{Document, Element, ElementId, ElementKind, ElementType};

/// Where a new element goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTarget<'a> {
    /// End of the top-level list.
    Root,
    /// End of a container's children. `side` picks the logical column of a
    /// columns container and is ignored for sections.
    Container {
        /// Id of the container.
        parent_id: &'a str,
        /// Logical column.
        side: ColumnSide,
    },
}

/// Partial update merged into an element.
///
/// `content` and `styles` replace the current values; `properties` keys are
/// merged into the element's typed properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPatch {
    /// New markup content.
    pub content: Option<String>,
    /// New CSS declarations (replaces the whole map).
    pub styles: Option<BTreeMap<String, String>>,
    /// Property keys to merge, using wire (camelCase) names.
    pub properties: Map<String, Value>,
}

impl ElementPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replaces the styles.
    #[must_use]
    pub fn styles(mut self, styles: BTreeMap<String, String>) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Sets one property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.styles.is_none() && self.properties.is_empty()
    }
}

/// Merges `patch` into `properties`, keeping the original if the result no
/// longer deserializes.
fn merge_properties<T>(properties: &mut T, patch: &Map<String, Value>) -> bool
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = properties_to_map(properties);
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    match serde_json::from_value(Value::Object(merged)) {
        Ok(updated) => {
            *properties = updated;
            true
        }
        Err(e) => {
            debug!("Ignoring property patch: {e}");
            false
        }
    }
}

impl ElementKind {
    /// Merges wire-named property keys into the typed properties.
    ///
    /// Returns false when the patch does not fit this element type.
    pub fn merge_properties(&mut self, patch: &Map<String, Value>) -> bool {
        if patch.is_empty() {
            return true;
        }
        match self {
            Self::Text(p) => merge_properties(p, patch),
            Self::Button(p) => merge_properties(p, patch),
            Self::Image(p) => merge_properties(p, patch),
            Self::Divider(p) => merge_properties(p, patch),
            Self::Spacer(p) => merge_properties(p, patch),
            Self::Header | Self::Footer => false,
            Self::Columns { properties, .. } => merge_properties(properties, patch),
            Self::Embed(p) => merge_properties(p, patch),
            Self::Social(p) => merge_properties(p, patch),
            Self::Section { properties, .. } => merge_properties(properties, patch),
        }
    }
}

impl Element {
    /// Applies a partial update.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(styles) = &patch.styles {
            self.styles.clone_from(styles);
        }
        self.kind.merge_properties(&patch.properties);
    }

    /// Appends a child; `side` only matters for columns containers.
    ///
    /// Returns false for non-containers and for nested containers.
    fn push_child(&mut self, child: Element, side: ColumnSide) -> bool {
        if child.is_container() {
            return false;
        }
        match &mut self.kind {
            ElementKind::Columns { columns, .. } => {
                columns.push(side, child);
                true
            }
            ElementKind::Section { children, .. } => {
                children.push(child);
                true
            }
            _ => false,
        }
    }

    fn move_child(&mut self, child_id: &str, direction: MoveDirection) -> bool {
        match &mut self.kind {
            ElementKind::Columns { columns, .. } => columns.move_within(child_id, direction),
            ElementKind::Section { children, .. } => swap_adjacent(children, child_id, direction),
            _ => false,
        }
    }

    fn remove_child(&mut self, child_id: &str) -> bool {
        match &mut self.kind {
            ElementKind::Columns { columns, .. } => columns.remove(child_id).is_some(),
            ElementKind::Section { children, .. } => {
                let before = children.len();
                children.retain(|c| c.id.as_str() != child_id);
                children.len() != before
            }
            _ => false,
        }
    }
}

/// Swaps the element with `id` and its neighbour in `direction`.
fn swap_adjacent(list: &mut [Element], id: &str, direction: MoveDirection) -> bool {
    let Some(pos) = list.iter().position(|e| e.id.as_str() == id) else {
        return false;
    };
    let target = match direction {
        MoveDirection::Up if pos > 0 => pos - 1,
        MoveDirection::Down if pos + 1 < list.len() => pos + 1,
        _ => return false,
    };
    list.swap(pos, target);
    true
}

impl Document {
    fn top_level_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id.as_str() == id)
    }

    /// Creates an element of `element_type` with its defaults and inserts it.
    ///
    /// Returns the new id, or `None` if the target container does not exist
    /// or cannot hold the element.
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        target: InsertTarget<'_>,
    ) -> Option<ElementId> {
        self.insert_element(Element::new(element_type), target)
    }

    /// Inserts an already built element.
    ///
    /// Any id in the inserted subtree that is already taken in the document
    /// is replaced with a fresh one. Returns the id the element ends up with.
    pub fn insert_element(
        &mut self,
        mut element: Element,
        target: InsertTarget<'_>,
    ) -> Option<ElementId> {
        let mut taken = HashSet::new();
        for existing in &self.elements {
            existing.walk(&mut |e| {
                taken.insert(e.id.to_string());
            });
        }
        reissue_taken_ids(&mut element, &mut taken);

        let id = element.id.clone();
        match target {
            InsertTarget::Root => {
                self.elements.push(element);
                Some(id)
            }
            InsertTarget::Container { parent_id, side } => {
                let parent = self.top_level_mut(parent_id)?;
                parent.push_child(element, side).then_some(id)
            }
        }
    }

    /// Merges a patch into the element with `id`, looking at top-level
    /// elements first and then one level into containers.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        if let Some(element) = self.top_level_mut(id) {
            element.apply_patch(patch);
            return true;
        }
        for parent in &mut self.elements {
            if let Some(child) = parent.child_mut(id) {
                child.apply_patch(patch);
                return true;
            }
        }
        false
    }

    /// Merges a patch into a specific child of a specific container.
    pub fn update_nested_element(
        &mut self,
        parent_id: &str,
        child_id: &str,
        patch: &ElementPatch,
    ) -> bool {
        let Some(child) = self
            .top_level_mut(parent_id)
            .and_then(|parent| parent.child_mut(child_id))
        else {
            return false;
        };
        child.apply_patch(patch);
        true
    }

    /// Swaps a top-level element with its neighbour; no-op at either end.
    pub fn move_element(&mut self, id: &str, direction: MoveDirection) -> bool {
        swap_adjacent(&mut self.elements, id, direction)
    }

    /// Moves a child within its container. In a columns container the child
    /// swaps with its neighbour in the same logical column (two positions
    /// away in the flat layout) and is a no-op at either end of that column.
    pub fn move_nested_element(
        &mut self,
        parent_id: &str,
        child_id: &str,
        direction: MoveDirection,
    ) -> bool {
        self.top_level_mut(parent_id)
            .is_some_and(|parent| parent.move_child(child_id, direction))
    }

    /// Removes a top-level element.
    pub fn delete_element(&mut self, id: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id.as_str() != id);
        self.elements.len() != before
    }

    /// Removes a child from its container. Columns are not rebalanced.
    pub fn delete_nested_element(&mut self, parent_id: &str, child_id: &str) -> bool {
        self.top_level_mut(parent_id)
            .is_some_and(|parent| parent.remove_child(child_id))
    }
}

/// Gives every element in the subtree whose id is in `taken` a fresh id,
/// recording all ids of the subtree as taken.
fn reissue_taken_ids(element: &mut Element, taken: &mut HashSet<String>) {
    if !taken.insert(element.id.to_string()) {
        let fresh = ElementId::generate();
        debug!("Id {} already in use, inserting as {fresh}", element.id);
        taken.insert(fresh.to_string());
        element.id = fresh;
    }
    match &mut element.kind {
        ElementKind::Columns { columns, .. } => {
            for child in columns.iter_mut() {
                reissue_taken_ids(child, taken);
            }
        }
        ElementKind::Section { children, .. } => {
            for child in children {
                reissue_taken_ids(child, taken);
            }
        }
        _ => {}
    }
}
