use crate::domain::model::Document;
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// In-process store for local runs and tests. Scan order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(collection: &str, documents: Vec<Document>) -> Self {
        let mut collections = HashMap::new();
        collections.insert(collection.to_string(), documents);
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Load `[{"id": "...", "fields": {...}}, ...]` into `collection`.
    pub fn from_seed_file<P: AsRef<Path>>(collection: &str, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        tracing::info!(
            "📥 Seeded {} documents into in-memory collection '{}'",
            documents.len(),
            collection
        );
        Ok(Self::with_documents(collection, documents))
    }

    pub async fn insert(&self, collection: &str, document: Document) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }
}

impl DocumentStore for MemoryStore {
    async fn scan(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }
}
