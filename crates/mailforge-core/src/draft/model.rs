//! Draft data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Element};

/// Store key of an owner's draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey(String);

impl DraftKey {
    /// Prefix shared by every draft key.
    pub const PREFIX: &'static str = "email_draft_";

    /// Key for the given owner.
    #[must_use]
    pub fn for_owner(owner: &str) -> Self {
        Self(format!("{}{owner}", Self::PREFIX))
    }

    /// String form of the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted snapshot of a document being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Top-level elements.
    #[serde(default, deserialize_with = "crate::document::deserialize_elements")]
    pub elements: Vec<Element>,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Owner identity the draft is keyed by.
    pub owner: String,
}

impl Draft {
    /// Takes a snapshot of `document` now.
    #[must_use]
    pub fn snapshot(document: &Document, owner: impl Into<String>) -> Self {
        Self {
            elements: document.elements.clone(),
            subject: document.subject.clone(),
            timestamp: Utc::now(),
            owner: owner.into(),
        }
    }

    /// Store key of this draft.
    #[must_use]
    pub fn key(&self) -> DraftKey {
        DraftKey::for_owner(&self.owner)
    }

    /// Replaces the content of `document` with this draft. The layout width
    /// is not part of a draft and is kept.
    pub fn restore_into(self, document: &mut Document) {
        document.elements = self.elements;
        document.subject = self.subject;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::ElementType;
    use serde_json::json;

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(DraftKey::for_owner("u42").as_str(), "email_draft_u42");
        assert_eq!(DraftKey::for_owner("u42"), DraftKey::for_owner("u42"));
    }

    #[test]
    fn test_wire_schema() {
        let mut doc = Document::new().with_subject("Hi");
        doc.elements.push(Element::new(ElementType::Divider));
        let draft = Draft::snapshot(&doc, "u1");

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["subject"], "Hi");
        assert_eq!(value["owner"], "u1");
        assert_eq!(value["elements"][0]["type"], "divider");
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_restore_skips_unknown_elements_and_keeps_width() {
        let draft: Draft = serde_json::from_value(json!({
            "elements": [{"id": "a", "type": "hologram"}, {"id": "b", "type": "spacer"}],
            "subject": "Saved",
            "timestamp": "2024-01-01T00:00:00Z",
            "owner": "u1"
        }))
        .unwrap();

        let mut doc = Document::new();
        doc.width = 700;
        draft.restore_into(&mut doc);
        assert_eq!(doc.subject, "Saved");
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.width, 700);
    }
}
