use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing;
use crate::types::AmountValue;

/// A published content item. `full_content` is the paid body; everything
/// else is free metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Store record id.
    pub id: String,
    /// Stable numeric identifier shared with the on-chain contract.
    /// Assigned once, immutable.
    pub content_id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Free-to-read teaser.
    pub preview: String,
    /// The paid body, released only through the unlock gate.
    pub full_content: String,
    /// Price before dynamic compounding, in smallest units. Fixed at
    /// creation.
    pub base_price: AmountValue,
    /// Creator wallet address.
    pub creator: String,
    pub creator_name: String,
    pub metadata_uri: String,
    /// Successful unlocks so far. Monotonically non-decreasing; the
    /// current price is always derived from this, never stored.
    pub unlock_count: u64,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Caller-supplied fields for publishing a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub preview: String,
    pub full_content: String,
    pub base_price: AmountValue,
    /// On-chain content id, when the contract assigned one already.
    #[serde(default)]
    pub content_id: Option<u64>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Catalog projection of a content item: everything except the paid body,
/// with the live computed price attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPreview {
    pub id: String,
    pub content_id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub preview: String,
    pub base_price: AmountValue,
    pub current_price: AmountValue,
    pub price_usd: String,
    pub creator: String,
    pub creator_name: String,
    pub metadata_uri: String,
    pub unlock_count: u64,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ContentPreview {
    pub fn of(content: &Content) -> Self {
        let current_price = pricing::compute_price(content.base_price, content.unlock_count);
        ContentPreview {
            id: content.id.clone(),
            content_id: content.content_id,
            title: content.title.clone(),
            description: content.description.clone(),
            category: content.category.clone(),
            preview: content.preview.clone(),
            base_price: content.base_price,
            current_price,
            price_usd: pricing::price_usd(current_price),
            creator: content.creator.clone(),
            creator_name: content.creator_name.clone(),
            metadata_uri: content.metadata_uri.clone(),
            unlock_count: content.unlock_count,
            created_at: content.created_at,
            tags: content.tags.clone(),
            image_url: content.image_url.clone(),
        }
    }
}
