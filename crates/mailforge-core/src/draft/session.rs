//! Editing session tying a document to its draft.

use std::sync::Arc;

use tracing::{info, warn};

use super::autosave::{AutosaveConfig, Autosaver};
use super::repository::DraftRepository;
use crate::document::Document;
use crate::store::KeyValueStore;

/// A document being edited by one owner, autosaved as it changes.
///
/// The session is the single writer of the owner's draft.
pub struct EditorSession<S> {
    owner: String,
    document: Document,
    repository: DraftRepository<S>,
    autosaver: Autosaver,
}

impl<S: KeyValueStore + 'static> EditorSession<S> {
    /// Starts a session on a fresh document, restoring the owner's draft
    /// over it when one exists.
    ///
    /// An unreadable draft is logged and ignored.
    pub async fn start(store: Arc<S>, owner: impl Into<String>, config: AutosaveConfig) -> Self {
        Self::start_with(store, owner, config, Document::new()).await
    }

    /// Like [`EditorSession::start`], with a caller-built default document.
    pub async fn start_with(
        store: Arc<S>,
        owner: impl Into<String>,
        config: AutosaveConfig,
        mut document: Document,
    ) -> Self {
        let owner = owner.into();
        let repository = DraftRepository::new(store);

        match repository.load(&owner).await {
            Ok(Some(draft)) => {
                info!(
                    "Restored draft for {owner} saved at {} ({} elements)",
                    draft.timestamp,
                    draft.elements.len()
                );
                draft.restore_into(&mut document);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable draft for {owner}: {e}"),
        }

        let autosaver =
            Autosaver::spawn(repository.clone(), owner.clone(), config, document.clone());
        Self {
            owner,
            document,
            repository,
            autosaver,
        }
    }

    /// Owner identity.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Current document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Applies a mutation and schedules a debounced save.
    pub fn edit<R>(&mut self, mutate: impl FnOnce(&mut Document) -> R) -> R {
        let result = mutate(&mut self.document);
        self.autosaver.record(&self.document);
        result
    }

    /// Writes pending edits now.
    pub async fn flush(&self) {
        self.autosaver.flush().await;
    }

    /// Ends the session after a confirmed send: timers are cancelled and the
    /// draft is deleted. Returns the sent document.
    pub async fn mark_sent(self) -> Document {
        self.autosaver.stop(false).await;
        match self.repository.delete(&self.owner).await {
            Ok(true) => info!("Deleted draft for {} after send", self.owner),
            Ok(false) => {}
            Err(e) => warn!("Failed to delete draft for {}: {e}", self.owner),
        }
        self.document
    }

    /// Ends the session, writing pending edits first. Returns the document.
    pub async fn close(self) -> Document {
        self.autosaver.stop(true).await;
        self.document
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::document::{ElementPatch, ElementType, InsertTarget};
    use crate::draft::{Draft, DraftKey};
    use crate::store::MemoryStore;
    use tokio::time::sleep;

    async fn session(store: &Arc<MemoryStore>) -> EditorSession<MemoryStore> {
        EditorSession::start(Arc::clone(store), "u1", AutosaveConfig::default()).await
    }

    async fn stored(store: &Arc<MemoryStore>) -> Option<Draft> {
        DraftRepository::new(Arc::clone(store)).load("u1").await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_writes_once() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session(&store).await;

        for _ in 0..5 {
            session.edit(|doc| doc.add_element(ElementType::Text, InsertTarget::Root));
            sleep(Duration::from_millis(300)).await;
        }
        assert_eq!(store.writes(), 0);

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(store.writes(), 1);
        assert_eq!(stored(&store).await.unwrap().elements.len(), 5);

        session.close().await;
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_snapshot_only_when_non_empty() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session(&store).await;

        sleep(Duration::from_secs(11)).await;
        assert_eq!(store.writes(), 0);

        session.edit(|doc| doc.subject = "Hello".into());
        sleep(Duration::from_secs(3)).await;
        assert_eq!(store.writes(), 1);
        // Subject only: the document has no elements yet.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.writes(), 1);

        session.edit(|doc| doc.add_element(ElementType::Divider, InsertTarget::Root));
        sleep(Duration::from_secs(10)).await;
        assert!(store.writes() >= 3);
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_restores_existing_draft() {
        let store = Arc::new(MemoryStore::new());
        let mut first = session(&store).await;
        first.edit(|doc| {
            doc.subject = "Launch".into();
            let id = doc.add_element(ElementType::Text, InsertTarget::Root).unwrap();
            doc.update_element(id.as_str(), &ElementPatch::new().content("Draft body"));
        });
        first.close().await;

        let second = session(&store).await;
        assert_eq!(second.document().subject, "Launch");
        assert_eq!(second.document().elements[0].content, "Draft body");
        second.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_sent_deletes_and_stops() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session(&store).await;
        session.edit(|doc| doc.add_element(ElementType::Text, InsertTarget::Root));
        session.flush().await;
        assert!(store.keys().await.contains(&DraftKey::for_owner("u1").to_string()));

        let sent = session.mark_sent().await;
        assert_eq!(sent.elements.len(), 1);
        assert!(stored(&store).await.is_none());

        let writes = store.writes();
        sleep(Duration::from_secs(20)).await;
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failures_do_not_end_session() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let mut session = session(&store).await;

        session.edit(|doc| doc.add_element(ElementType::Text, InsertTarget::Root));
        sleep(Duration::from_secs(6)).await;
        assert_eq!(store.writes(), 0);

        store.fail_writes(false);
        session.edit(|doc| doc.add_element(ElementType::Text, InsertTarget::Root));
        session.flush().await;
        assert_eq!(stored(&store).await.unwrap().elements.len(), 2);
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_saves_on_close() {
        let store = Arc::new(MemoryStore::new());
        let config = AutosaveConfig {
            interval: Duration::ZERO,
            debounce: Duration::from_secs(2),
        };
        let mut session = EditorSession::start(Arc::clone(&store), "u1", config).await;

        session.edit(|doc| doc.add_element(ElementType::Text, InsertTarget::Root));
        session.close().await;
        assert_eq!(store.writes(), 1);
        assert_eq!(stored(&store).await.unwrap().elements.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_draft_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(DraftKey::for_owner("u1").as_str(), b"garbage".to_vec())
            .await
            .unwrap();
        let session = session(&store).await;
        assert!(session.document().is_empty());
        session.close().await;
    }
}
