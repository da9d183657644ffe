//! Two-column container storage.
//!
//! In memory a columns container keeps its two logical columns as separate
//! sequences. The persisted form is a single flat `children` array where the
//! child at index *i* belongs to the left column iff *i* is even. Conversion
//! happens only in [`ColumnPair::to_flat`] / [`ColumnPair::from_flat`]; when
//! the columns have different lengths the shorter one is padded with holes
//! so every child keeps its parity.

use serde::{Deserialize, Serialize};

use super::model::Element;

/// One of the two logical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSide {
    /// Left column (even flat indices).
    #[default]
    Left,
    /// Right column (odd flat indices).
    Right,
}

impl ColumnSide {
    /// Column owning the given flat index.
    #[must_use]
    pub const fn from_flat_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }

    /// Offset added to `position * 2` in the flat array.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Parse from string, defaulting to left.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("right") {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// String representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Direction for reordering an element among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start.
    Up,
    /// Towards the end.
    Down,
}

/// Left and right column contents of a columns container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnPair {
    left: Vec<Element>,
    right: Vec<Element>,
}

impl ColumnPair {
    /// Creates an empty pair.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Creates a pair from two explicit columns.
    #[must_use]
    pub const fn from_columns(left: Vec<Element>, right: Vec<Element>) -> Self {
        Self { left, right }
    }

    /// Flat index of the element at `position` within `side`.
    #[must_use]
    pub const fn flat_index(side: ColumnSide, position: usize) -> usize {
        position * 2 + side.offset()
    }

    /// Elements of one column.
    #[must_use]
    pub fn column(&self, side: ColumnSide) -> &[Element] {
        match side {
            ColumnSide::Left => &self.left,
            ColumnSide::Right => &self.right,
        }
    }

    fn column_mut(&mut self, side: ColumnSide) -> &mut Vec<Element> {
        match side {
            ColumnSide::Left => &mut self.left,
            ColumnSide::Right => &mut self.right,
        }
    }

    /// Left column.
    #[must_use]
    pub fn left(&self) -> &[Element] {
        &self.left
    }

    /// Right column.
    #[must_use]
    pub fn right(&self) -> &[Element] {
        &self.right
    }

    /// Total number of children across both columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Returns true if both columns are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Appends an element at the end of a column, returning its flat index.
    pub fn push(&mut self, side: ColumnSide, element: Element) -> usize {
        let column = self.column_mut(side);
        column.push(element);
        Self::flat_index(side, column.len() - 1)
    }

    /// Locates a child by id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<(ColumnSide, usize)> {
        [ColumnSide::Left, ColumnSide::Right]
            .into_iter()
            .find_map(|side| {
                self.column(side)
                    .iter()
                    .position(|e| e.id.as_str() == id)
                    .map(|pos| (side, pos))
            })
    }

    /// Child with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.position(id)
            .map(|(side, pos)| &self.column(side)[pos])
    }

    /// Mutable child with the given id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        let (side, pos) = self.position(id)?;
        self.column_mut(side).get_mut(pos)
    }

    /// Removes a child. The other column is left untouched, so the columns
    /// may end up with different lengths.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let (side, pos) = self.position(id)?;
        Some(self.column_mut(side).remove(pos))
    }

    /// Swaps a child with its neighbour in the same column.
    ///
    /// Returns false (and changes nothing) when the child is missing or
    /// already at that end of its column.
    pub fn move_within(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some((side, pos)) = self.position(id) else {
            return false;
        };
        let column = self.column_mut(side);
        let target = match direction {
            MoveDirection::Up if pos > 0 => pos - 1,
            MoveDirection::Down if pos + 1 < column.len() => pos + 1,
            _ => return false,
        };
        column.swap(pos, target);
        true
    }

    /// Iterates children in flat order (left 0, right 0, left 1, ...).
    pub fn iter(&self) -> impl Iterator<Item = (ColumnSide, &Element)> {
        let rows = self.left.len().max(self.right.len());
        (0..rows).flat_map(move |row| {
            let left = self.left.get(row).map(|e| (ColumnSide::Left, e));
            let right = self.right.get(row).map(|e| (ColumnSide::Right, e));
            left.into_iter().chain(right)
        })
    }

    /// Mutable access to every child, left column first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.left.iter_mut().chain(self.right.iter_mut())
    }

    /// Flat alternating representation with holes for uneven columns.
    ///
    /// Trailing holes are dropped, so the array ends with a real element.
    #[must_use]
    pub fn to_flat(&self) -> Vec<Option<&Element>> {
        let rows = self.left.len().max(self.right.len());
        let mut flat = Vec::with_capacity(rows * 2);
        for row in 0..rows {
            flat.push(self.left.get(row));
            flat.push(self.right.get(row));
        }
        while matches!(flat.last(), Some(None)) {
            flat.pop();
        }
        flat
    }

    /// Rebuilds the pair from a flat alternating array.
    #[must_use]
    pub fn from_flat(flat: Vec<Option<Element>>) -> Self {
        let mut pair = Self::new();
        for (index, slot) in flat.into_iter().enumerate() {
            if let Some(element) = slot {
                pair.column_mut(ColumnSide::from_flat_index(index))
                    .push(element);
            }
        }
        pair
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::ElementType;

    fn text(id: &str) -> Element {
        let mut element = Element::new(ElementType::Text);
        element.id = id.into();
        element
    }

    fn flat_ids(pair: &ColumnPair) -> Vec<Option<String>> {
        pair.to_flat()
            .into_iter()
            .map(|e| e.map(|e| e.id.to_string()))
            .collect()
    }

    #[test]
    fn test_flat_index_formula() {
        assert_eq!(ColumnPair::flat_index(ColumnSide::Left, 0), 0);
        assert_eq!(ColumnPair::flat_index(ColumnSide::Right, 0), 1);
        assert_eq!(ColumnPair::flat_index(ColumnSide::Left, 3), 6);
        assert_eq!(ColumnPair::flat_index(ColumnSide::Right, 2), 5);
    }

    #[test]
    fn test_push_returns_flat_index() {
        let mut pair = ColumnPair::new();
        assert_eq!(pair.push(ColumnSide::Left, text("a")), 0);
        assert_eq!(pair.push(ColumnSide::Left, text("b")), 2);
        assert_eq!(pair.push(ColumnSide::Right, text("c")), 1);
    }

    #[test]
    fn test_uneven_columns_keep_parity_in_flat_form() {
        let mut pair = ColumnPair::new();
        pair.push(ColumnSide::Left, text("a"));
        pair.push(ColumnSide::Left, text("b"));
        pair.push(ColumnSide::Left, text("c"));
        pair.push(ColumnSide::Right, text("x"));

        assert_eq!(
            flat_ids(&pair),
            vec![
                Some("a".to_string()),
                Some("x".to_string()),
                Some("b".to_string()),
                None,
                Some("c".to_string()),
            ]
        );

        let flat = pair.to_flat().into_iter().map(|e| e.cloned()).collect();
        assert_eq!(ColumnPair::from_flat(flat), pair);
    }

    #[test]
    fn test_trailing_holes_dropped() {
        let mut pair = ColumnPair::new();
        pair.push(ColumnSide::Right, text("x"));
        pair.push(ColumnSide::Right, text("y"));
        assert_eq!(
            flat_ids(&pair),
            vec![None, Some("x".to_string()), None, Some("y".to_string())]
        );
    }

    #[test]
    fn test_move_within_is_noop_at_column_ends() {
        let mut pair = ColumnPair::new();
        pair.push(ColumnSide::Left, text("a"));
        pair.push(ColumnSide::Right, text("x"));
        pair.push(ColumnSide::Left, text("b"));

        assert!(!pair.move_within("a", MoveDirection::Up));
        assert!(!pair.move_within("b", MoveDirection::Down));
        assert!(!pair.move_within("x", MoveDirection::Up));
        assert!(!pair.move_within("x", MoveDirection::Down));
        assert!(!pair.move_within("missing", MoveDirection::Up));

        assert!(pair.move_within("a", MoveDirection::Down));
        assert_eq!(pair.left()[0].id.as_str(), "b");
        assert_eq!(pair.left()[1].id.as_str(), "a");
        assert_eq!(pair.right()[0].id.as_str(), "x");
    }

    #[test]
    fn test_remove_does_not_rebalance() {
        let mut pair = ColumnPair::new();
        pair.push(ColumnSide::Left, text("a"));
        pair.push(ColumnSide::Right, text("x"));
        pair.push(ColumnSide::Left, text("b"));
        pair.push(ColumnSide::Right, text("y"));

        assert!(pair.remove("a").is_some());
        assert_eq!(pair.left().len(), 1);
        assert_eq!(pair.right().len(), 2);
        assert_eq!(pair.position("y"), Some((ColumnSide::Right, 1)));
        assert!(pair.remove("a").is_none());
    }

    #[test]
    fn test_iter_in_flat_order() {
        let mut pair = ColumnPair::new();
        pair.push(ColumnSide::Left, text("a"));
        pair.push(ColumnSide::Left, text("b"));
        pair.push(ColumnSide::Right, text("x"));
        let order: Vec<_> = pair.iter().map(|(side, e)| (side, e.id.to_string())).collect();
        assert_eq!(
            order,
            vec![
                (ColumnSide::Left, "a".to_string()),
                (ColumnSide::Right, "x".to_string()),
                (ColumnSide::Left, "b".to_string()),
            ]
        );
    }
}
