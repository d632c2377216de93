use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AmountValue;

/// One successful unlock, as recorded in the ledger. Appended, never
/// mutated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    pub content_id: u64,
    pub transaction_hash: String,
    /// Unit price actually charged for this unlock.
    pub price: AmountValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub unlocked_at: DateTime<Utc>,
}

/// Per-wallet bookkeeping, keyed by the normalized address. Created
/// lazily on first reference, never deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub address: String,
    pub unlocked_contents: Vec<UnlockRecord>,
    pub created_contents: Vec<u64>,
    pub total_spent: AmountValue,
    pub total_earned: AmountValue,
    pub referral_earnings: AmountValue,
}

impl UserAccount {
    pub fn new(address: String) -> Self {
        UserAccount {
            address,
            unlocked_contents: Vec::new(),
            created_contents: Vec::new(),
            total_spent: AmountValue::ZERO,
            total_earned: AmountValue::ZERO,
            referral_earnings: AmountValue::ZERO,
        }
    }
}

/// Read-only projection of an account's totals.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_unlocked: usize,
    pub total_created: usize,
    pub total_spent: AmountValue,
    pub total_earned: AmountValue,
    pub referral_earnings: AmountValue,
}
