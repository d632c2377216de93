//! Wire types for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::types::{AmountValue, Content};

/// Body of a 402 Payment Required response: everything a client needs to
/// pay and resubmit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentChallenge {
    pub status_code: u16,
    pub message: String,
    /// Current price in smallest units, computed at challenge time.
    pub price: AmountValue,
    pub price_usd: String,
    pub content_id: u64,
    pub pay_to: String,
    pub network: String,
    pub chain_id: u64,
}

/// Successful unlock response: the full content plus payment evidence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedContent {
    #[serde(flatten)]
    pub content: Content,
    /// Price after this unlock was counted. Informational — the charged
    /// price is the one the proof was verified against.
    pub current_price: AmountValue,
    pub transaction_hash: String,
    pub unlocked: bool,
}

/// Standalone verification request body. The `x-payment` header, when
/// present, overrides `payment_data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentBody {
    #[serde(default)]
    pub payment_data: Option<String>,
    pub content_id: String,
    pub amount: AmountValue,
}

/// Payment subsystem status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub enabled: bool,
    pub network: String,
    pub chain_id: u64,
    pub recipient: String,
}

/// Unlock membership check result.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockCheck {
    pub unlocked: bool,
}
