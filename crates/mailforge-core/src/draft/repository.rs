//! Draft storage over a keyed store.

use std::sync::Arc;

use tracing::debug;

use super::model::{Draft, DraftKey};
use crate::Result;
use crate::store::KeyValueStore;

/// Loads, saves and deletes drafts.
pub struct DraftRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for DraftRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> DraftRepository<S> {
    /// Create a repository over a shared store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get the owner's draft, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored draft is not valid JSON.
    pub async fn load(&self, owner: &str) -> Result<Option<Draft>> {
        let key = DraftKey::for_owner(owner);
        match self.store.get(key.as_str()).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store a draft under its owner's key, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store fails.
    pub async fn save(&self, draft: &Draft) -> Result<()> {
        let bytes = serde_json::to_vec(draft)?;
        let key = draft.key();
        self.store.set(key.as_str(), bytes).await?;
        debug!(
            "Saved draft {key} ({} elements) at {}",
            draft.elements.len(),
            draft.timestamp
        );
        Ok(())
    }

    /// Delete the owner's draft. Returns true if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn delete(&self, owner: &str) -> Result<bool> {
        self.store.delete(DraftKey::for_owner(owner).as_str()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{Document, Element, ElementType};
    use crate::store::{MemoryStore, SqliteStore};

    fn draft(owner: &str) -> Draft {
        let mut doc = Document::new().with_subject("Weekly");
        doc.elements.push(Element::new(ElementType::Text).with_content("Hello"));
        Draft::snapshot(&doc, owner)
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let repo = DraftRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load("u1").await.unwrap().is_none());

        let saved = draft("u1");
        repo.save(&saved).await.unwrap();
        assert_eq!(repo.load("u1").await.unwrap(), Some(saved));
        assert!(repo.load("u2").await.unwrap().is_none());

        assert!(repo.delete("u1").await.unwrap());
        assert!(repo.load("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins_in_sqlite() {
        let repo = DraftRepository::new(Arc::new(SqliteStore::in_memory().await.unwrap()));
        repo.save(&draft("u1")).await.unwrap();

        let mut newer = draft("u1");
        newer.subject = "Weekly v2".into();
        repo.save(&newer).await.unwrap();

        assert_eq!(repo.load("u1").await.unwrap().unwrap().subject, "Weekly v2");
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(DraftKey::for_owner("u1").as_str(), b"{not json".to_vec())
            .await
            .unwrap();
        let repo = DraftRepository::new(store);
        assert!(matches!(repo.load("u1").await, Err(crate::Error::Serde(_))));
    }
}
