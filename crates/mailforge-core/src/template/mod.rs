//! Named document templates.
//!
//! Templates live in the same keyed store as drafts, one key per template
//! plus an index key listing every saved name.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::ValidationError;
use crate::store::KeyValueStore;
use crate::Result;

const TEMPLATE_PREFIX: &str = "email_template_";
const INDEX_KEY: &str = "email_templates_index";

/// A stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template name.
    pub name: String,
    /// Saved document.
    pub document: Document,
    /// When the template was last saved.
    pub saved_at: DateTime<Utc>,
}

/// Library of named templates over a keyed store.
pub struct TemplateLibrary<S> {
    store: Arc<S>,
}

impl<S> Clone for TemplateLibrary<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn validate_name(name: &str) -> std::result::Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > 100 || trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidTemplateName(name.to_string()));
    }
    Ok(trimmed)
}

fn template_key(name: &str) -> String {
    format!("{TEMPLATE_PREFIX}{name}")
}

impl<S: KeyValueStore> TemplateLibrary<S> {
    /// Create a library over a shared store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn index(&self) -> Result<BTreeSet<String>> {
        match self.store.get(INDEX_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(BTreeSet::new()),
        }
    }

    async fn write_index(&self, index: &BTreeSet<String>) -> Result<()> {
        self.store.set(INDEX_KEY, serde_json::to_vec(index)?).await
    }

    /// Save a document under `name`, replacing any template with that name.
    ///
    /// A new name is only kept once the index lists it: if the index write
    /// fails, the template key is removed again.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long or contains control
    /// characters, or if the store fails.
    pub async fn save(&self, name: &str, document: &Document) -> Result<()> {
        let name = validate_name(name)?;
        let template = Template {
            name: name.to_string(),
            document: document.clone(),
            saved_at: Utc::now(),
        };
        let key = template_key(name);
        let mut index = self.index().await?;
        let is_new = index.insert(name.to_string());

        self.store.set(&key, serde_json::to_vec(&template)?).await?;

        if is_new {
            if let Err(e) = self.write_index(&index).await {
                warn!("Indexing template {name:?} failed, removing it: {e}");
                if let Err(cleanup) = self.store.delete(&key).await {
                    warn!("Template {name:?} left unindexed: {cleanup}");
                }
                return Err(e);
            }
        }
        debug!("Saved template {name:?}");
        Ok(())
    }

    /// Load a template by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the store fails or the stored
    /// template is not valid JSON.
    pub async fn load(&self, name: &str) -> Result<Option<Template>> {
        let name = validate_name(name)?;
        match self.store.get(&template_key(name)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete a template. Returns true if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the store fails.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let name = validate_name(name)?;
        let removed = self.store.delete(&template_key(name)).await?;

        let mut index = self.index().await?;
        if index.remove(name) {
            self.write_index(&index).await?;
        }
        Ok(removed)
    }

    /// Names of all saved templates, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the index is corrupt.
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self.index().await?.into_iter().collect())
    }
}
