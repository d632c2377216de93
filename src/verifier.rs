//! Payment verification.
//!
//! A proof is an opaque token whose meaning depends on the configured
//! [`VerificationMode`]. The `chain-verified` sentinel short-circuits in
//! every mode: the caller has already proven unlock status through an
//! independent on-chain read, so there is no payment left to verify.

use bon::Builder;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::pricing;
use crate::settlement::{SettlementOracle, SettlementRequest};
use crate::types::AmountValue;

/// Proof sentinel: unlock already proven by an on-chain `hasUnlocked` read.
pub const CHAIN_VERIFIED_PROOF: &str = "chain-verified";

/// Transaction reference reported for chain-shortcut approvals.
pub const ON_CHAIN_TRANSACTION: &str = "on-chain-verified";

/// Proof sentinel accepted unconditionally in mock mode.
pub const MOCK_SUCCESS_PROOF: &str = "mock-payment-success";

/// Transaction-hash prefix accepted as proof-of-payment in mock mode.
pub const TRANSACTION_HASH_PREFIX: &str = "0x";

/// How payment proofs are validated. Selected once at construction from
/// configuration; each mode's contract is independently testable.
#[derive(Debug, Clone)]
pub enum VerificationMode<S> {
    /// No settlement credentials configured; accept the mock sentinels.
    Mock,
    /// Delegate to the external settlement oracle.
    Facilitator(S),
}

#[derive(Builder, Debug, Clone)]
pub struct PaymentVerifier<S> {
    pub mode: VerificationMode<S>,
    /// Payee forwarded to the settlement oracle.
    #[builder(into)]
    pub pay_to: String,
    #[builder(into)]
    pub network: String,
}

/// Verification verdict. Business-level rejections are values here, never
/// errors — only infrastructure faults surface as `Err`.
#[derive(Debug, Clone)]
pub enum Verdict {
    Approved(Approved),
    Rejected(Rejected),
}

#[derive(Debug, Clone)]
pub struct Approved {
    pub transaction_hash: String,
}

#[derive(Debug, Clone)]
pub struct Rejected {
    pub reason: String,
}

impl Verdict {
    pub fn approved(transaction_hash: impl Into<String>) -> Self {
        Verdict::Approved(Approved {
            transaction_hash: transaction_hash.into(),
        })
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Verdict::Rejected(Rejected {
            reason: reason.into(),
        })
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved(_))
    }

    pub fn as_approved(&self) -> Option<&Approved> {
        match self {
            Verdict::Approved(approved) => Some(approved),
            _ => None,
        }
    }

    pub fn as_rejected(&self) -> Option<&Rejected> {
        match self {
            Verdict::Rejected(rejected) => Some(rejected),
            _ => None,
        }
    }
}

/// Wire form of a verdict. Success always carries a transaction
/// reference; failure always carries an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Verdict> for VerificationResult {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approved(approved) => VerificationResult {
                success: true,
                transaction_hash: Some(approved.transaction_hash),
                error: None,
            },
            Verdict::Rejected(rejected) => VerificationResult {
                success: false,
                transaction_hash: None,
                error: Some(rejected.reason),
            },
        }
    }
}

impl<S: SettlementOracle> PaymentVerifier<S> {
    /// Validate a payment proof against the expected amount for a resource.
    ///
    /// `Ok(Verdict::Rejected)` is a business rejection; `Err` means the
    /// settlement oracle call itself failed and the caller should report
    /// a 5xx-class outcome without mutating anything.
    pub async fn verify(
        &self,
        proof: &str,
        expected_amount: AmountValue,
        content_id: &str,
        resource_url: &str,
    ) -> Result<Verdict, S::Error> {
        if proof == CHAIN_VERIFIED_PROOF {
            tracing::info!(content_id, "unlock already proven on-chain");
            return Ok(Verdict::approved(ON_CHAIN_TRANSACTION));
        }

        match &self.mode {
            VerificationMode::Mock => Ok(self.verify_mock(proof, content_id)),
            VerificationMode::Facilitator(oracle) => {
                self.settle(oracle, proof, expected_amount, content_id, resource_url)
                    .await
            }
        }
    }

    pub fn is_facilitator(&self) -> bool {
        matches!(self.mode, VerificationMode::Facilitator(_))
    }

    fn verify_mock(&self, proof: &str, content_id: &str) -> Verdict {
        tracing::info!(content_id, "verifying payment in mock mode");

        if proof == MOCK_SUCCESS_PROOF {
            return Verdict::approved(synthesized_transaction_hash());
        }

        // A transaction hash stands as proof-of-payment by reference and
        // is echoed back unchanged.
        if proof.starts_with(TRANSACTION_HASH_PREFIX) {
            return Verdict::approved(proof);
        }

        Verdict::rejected("Invalid payment data in mock mode")
    }

    async fn settle(
        &self,
        oracle: &S,
        proof: &str,
        expected_amount: AmountValue,
        content_id: &str,
        resource_url: &str,
    ) -> Result<Verdict, S::Error> {
        tracing::info!(content_id, "settling payment with facilitator");

        let receipt = oracle
            .settle(SettlementRequest {
                resource_url: resource_url.to_string(),
                method: "GET".to_string(),
                payment_data: proof.to_string(),
                price: pricing::price_usd(expected_amount),
                pay_to: self.pay_to.clone(),
                network: self.network.clone(),
            })
            .await?;

        if receipt.is_settled() {
            let transaction = receipt.transaction();
            tracing::info!(%transaction, "payment settled");
            Ok(Verdict::approved(transaction))
        } else {
            tracing::warn!(status = receipt.status, "payment settlement refused");
            Ok(Verdict::rejected(format!(
                "Payment failed with status {}",
                receipt.status
            )))
        }
    }
}

/// Mock transaction hash: millisecond timestamp in hex, zero-padded the
/// way the chain's hashes are.
fn synthesized_transaction_hash() -> String {
    format!("0x{:x}{}", Utc::now().timestamp_millis(), "0".repeat(48))
}
