//! Settlement oracle interface.
//!
//! In facilitator mode the gate never decides on its own whether a real
//! payment is acceptable; the oracle wrapping the payment-facilitation
//! service is the source of truth for accept/reject.

use serde::{Deserialize, Serialize};

/// Payment settlement request forwarded to the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    /// Canonical resource identity the proof must be bound to. The oracle
    /// rejects proofs signed for any other resource.
    pub resource_url: String,
    pub method: String,
    /// The caller's payment proof, forwarded verbatim.
    pub payment_data: String,
    /// Expected price in display currency.
    pub price: String,
    pub pay_to: String,
    pub network: String,
}

/// Outcome reported by the oracle. A 200 status means the payment
/// settled; anything else is a refusal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_receipt: Option<PaymentReceipt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default)]
    pub transaction: String,
}

impl SettlementReceipt {
    pub fn is_settled(&self) -> bool {
        self.status == 200
    }

    pub fn transaction(&self) -> String {
        self.payment_receipt
            .as_ref()
            .map(|receipt| receipt.transaction.clone())
            .unwrap_or_default()
    }
}

/// External settlement oracle.
///
/// Errors returned here are infrastructure faults (the oracle could not
/// be reached or answered garbage), not payment refusals — refusals come
/// back as a non-200 [`SettlementReceipt`].
pub trait SettlementOracle {
    type Error: std::error::Error + Send;

    fn settle(
        &self,
        request: SettlementRequest,
    ) -> impl Future<Output = Result<SettlementReceipt, Self::Error>> + Send;
}
