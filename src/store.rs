//! Content storage.
//!
//! The gate only ever touches content through [`ContentStore`], so a
//! transactional store can replace the in-memory map without changing the
//! unlock logic. `increment_unlock_count` must stay a single atomic
//! read-modify-write: two concurrent unlocks of the same item must each
//! bump the counter exactly once, and the gate never performs the
//! read-then-write itself across two calls.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::{Content, ContentDraft};

pub trait ContentStore {
    /// Fetch a content item by record id.
    fn get(&self, id: &str) -> impl Future<Output = Option<Content>> + Send;

    /// Publish a new content item, assigning its record and chain ids.
    fn put(&self, draft: ContentDraft, creator: &str) -> impl Future<Output = Content> + Send;

    /// Atomically bump the unlock counter, returning the new count.
    fn increment_unlock_count(&self, id: &str) -> impl Future<Output = Option<u64>> + Send;

    fn list(&self) -> impl Future<Output = Vec<Content>> + Send;
}

/// Memory-resident store. Resets on restart.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    contents: HashMap<String, Content>,
    next_content_id: u64,
}

impl Default for StoreInner {
    fn default() -> Self {
        StoreInner {
            contents: HashMap::new(),
            next_content_id: 1,
        }
    }
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryContentStore {
    async fn get(&self, id: &str) -> Option<Content> {
        self.inner.read().await.contents.get(id).cloned()
    }

    async fn put(&self, draft: ContentDraft, creator: &str) -> Content {
        let mut inner = self.inner.write().await;

        // A chain-assigned id wins; keep the counter ahead of it.
        let content_id = match draft.content_id {
            Some(chain_id) => {
                if chain_id >= inner.next_content_id {
                    inner.next_content_id = chain_id + 1;
                }
                chain_id
            }
            None => {
                let assigned = inner.next_content_id;
                inner.next_content_id += 1;
                assigned
            }
        };

        let id = Uuid::new_v4().to_string();
        let content = Content {
            id: id.clone(),
            content_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            preview: draft.preview,
            full_content: draft.full_content,
            base_price: draft.base_price,
            creator: creator.to_string(),
            creator_name: draft
                .creator_name
                .unwrap_or_else(|| "Anonymous".to_string()),
            metadata_uri: draft
                .metadata_uri
                .unwrap_or_else(|| format!("ipfs://Qm{}", &id[..20])),
            unlock_count: 0,
            created_at: Utc::now(),
            tags: draft.tags.unwrap_or_default(),
            image_url: draft.image_url,
        };

        inner.contents.insert(id, content.clone());
        content
    }

    async fn increment_unlock_count(&self, id: &str) -> Option<u64> {
        let mut inner = self.inner.write().await;
        let content = inner.contents.get_mut(id)?;
        content.unlock_count += 1;
        Some(content.unlock_count)
    }

    async fn list(&self) -> Vec<Content> {
        self.inner.read().await.contents.values().cloned().collect()
    }
}
