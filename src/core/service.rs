//! Document service
//!
//! Combines a document source with the overlay store: documents are loaded
//! once, de-duplicated by id, and overlay content shadows source content.
//! Edits are unescaped, kept in memory, and written through to the store.

use std::collections::HashSet;

use thiserror::Error;

use crate::core::document::Document;
use crate::core::source::{DocumentSource, SourceError};
use crate::core::store::{OverlayStore, StoreError};
use crate::render::normalize;

/// Errors surfaced to the shell.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The document set with per-user edits applied.
pub struct DocumentService<S> {
    source: S,
    store: OverlayStore,
    docs: Vec<Document>,
}

impl<S: DocumentSource> DocumentService<S> {
    /// Load all documents and apply saved overlays.
    pub fn open(source: S, store: OverlayStore) -> Result<Self, ServiceError> {
        let mut docs = source.list()?;

        // First occurrence wins when two files map to the same id.
        let mut seen = HashSet::new();
        docs.retain(|doc| {
            let fresh = seen.insert(doc.id.clone());
            if !fresh {
                tracing::debug!("skipping duplicate document id: {}", doc.id);
            }
            fresh
        });

        for doc in &mut docs {
            if let Some(saved) = store.get(&doc.id) {
                doc.content = saved.to_string();
            }
        }

        tracing::info!("loaded {} documents", docs.len());
        Ok(Self { source, store, docs })
    }

    /// All documents in display order.
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    /// A single document by id.
    pub fn get(&self, id: &str) -> Result<&Document, ServiceError> {
        self.docs
            .iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Whether a document currently has saved edits.
    pub fn is_edited(&self, id: &str) -> bool {
        self.store.get(id).is_some()
    }

    /// Save edited content for a document: unescape, update the in-memory
    /// copy, write through to the overlay store.
    pub fn save(&mut self, id: &str, content: &str) -> Result<(), ServiceError> {
        let normalized = normalize::unescape_literals(content);
        let doc = self
            .docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        doc.content = normalized.clone();
        self.store.put(id, &normalized)?;
        tracing::info!("saved document {id}");
        Ok(())
    }

    /// Discard saved edits and restore the source content.
    pub fn reset(&mut self, id: &str) -> Result<(), ServiceError> {
        self.store.remove(id)?;
        let fresh = self
            .source
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let doc = self
            .docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        doc.content = fresh.content;
        Ok(())
    }
}
