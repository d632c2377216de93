//! The unlock gate: challenge, verify, settle the bookkeeping, release.
//!
//! The gate is stateless across requests. Each request reconstructs its
//! position in the protocol from the presence of a proof header and the
//! live store/ledger state.

use std::sync::Arc;

use bon::Builder;
use url::Url;

use crate::errors::UnlockError;
use crate::ledger::UnlockLedger;
use crate::pricing;
use crate::settlement::SettlementOracle;
use crate::store::ContentStore;
use crate::transport::{PaymentChallenge, UnlockedContent};
use crate::types::{AmountValue, Content, ContentDraft};
use crate::verifier::{PaymentVerifier, Verdict};

/// Payee and network identity carried in 402 challenges.
#[derive(Builder, Debug, Clone)]
pub struct GateSettings {
    /// Recipient of payments. Challenges fall back to the content
    /// creator when unset.
    pub pay_to: Option<String>,
    #[builder(into)]
    pub network: String,
    pub chain_id: u64,
    /// Public base URL payment proofs are bound against.
    pub resource_base_url: Url,
}

#[derive(Builder)]
pub struct UnlockGate<C, S> {
    pub store: Arc<C>,
    pub ledger: Arc<UnlockLedger>,
    pub verifier: PaymentVerifier<S>,
    pub settings: GateSettings,
}

impl<C: ContentStore, S: SettlementOracle> UnlockGate<C, S> {
    /// Serve a content-fetch request.
    ///
    /// Without a proof this is a terminal 402 challenge carrying the
    /// price computed from live store state. With a proof, verification
    /// runs against that same freshly computed price — a stale price
    /// from an earlier challenge is never honored once other unlocks
    /// raised it.
    pub async fn request_content(
        &self,
        id: &str,
        proof: Option<&str>,
        wallet: Option<&str>,
    ) -> Result<UnlockedContent, UnlockError> {
        let content = self
            .store
            .get(id)
            .await
            .ok_or_else(|| UnlockError::NotFound(id.to_string()))?;
        let current_price = pricing::compute_price(content.base_price, content.unlock_count);

        let Some(proof) = proof else {
            tracing::info!(
                content_id = content.content_id,
                price = %current_price,
                "payment required"
            );
            return Err(UnlockError::PaymentRequired(Box::new(self.challenge(
                &content,
                current_price,
                "Payment required to access this content",
            ))));
        };

        let verdict = self
            .verifier
            .verify(
                proof,
                current_price,
                &content.content_id.to_string(),
                &self.resource_url(id),
            )
            .await
            .map_err(|err| UnlockError::Infrastructure(err.to_string()))?;

        let approved = match verdict {
            Verdict::Approved(approved) => approved,
            Verdict::Rejected(rejected) => {
                tracing::warn!(
                    content_id = content.content_id,
                    reason = %rejected.reason,
                    "payment rejected"
                );
                return Err(UnlockError::PaymentRequired(Box::new(self.challenge(
                    &content,
                    current_price,
                    &rejected.reason,
                ))));
            }
        };

        // Counter first, then re-read: the charged price stays the
        // pre-increment one, and the raised price applies to the next
        // unlock only.
        self.store
            .increment_unlock_count(id)
            .await
            .ok_or_else(|| UnlockError::NotFound(id.to_string()))?;
        let updated = self
            .store
            .get(id)
            .await
            .ok_or_else(|| UnlockError::NotFound(id.to_string()))?;
        let new_price = pricing::compute_price(updated.base_price, updated.unlock_count);

        tracing::info!(
            content_id = updated.content_id,
            unlock_count = updated.unlock_count,
            charged = %current_price,
            next_price = %new_price,
            transaction = %approved.transaction_hash,
            "content unlocked"
        );

        // Anonymous unlocks are fine: payment is the gate, not identity.
        if let Some(wallet) = wallet {
            self.ledger
                .record_unlock(
                    wallet,
                    updated.content_id,
                    &approved.transaction_hash,
                    current_price,
                    None,
                )
                .await;
        }

        Ok(UnlockedContent {
            content: updated,
            current_price: new_price,
            transaction_hash: approved.transaction_hash,
            unlocked: true,
        })
    }

    /// Publish new content and credit the creator's account.
    pub async fn create_content(
        &self,
        draft: ContentDraft,
        creator: Option<&str>,
    ) -> Result<Content, UnlockError> {
        let creator =
            creator.ok_or_else(|| UnlockError::InvalidInput("Wallet address required".to_string()))?;

        let content = self.store.put(draft, creator).await;
        self.ledger
            .record_creation(creator, content.content_id)
            .await;

        tracing::info!(
            content_id = content.content_id,
            creator,
            "content published"
        );
        Ok(content)
    }

    /// Verify a proof without serving content.
    pub async fn verify_payment(
        &self,
        proof: &str,
        content_id: &str,
        amount: AmountValue,
    ) -> Result<Verdict, UnlockError> {
        self.verifier
            .verify(proof, amount, content_id, &self.resource_url(content_id))
            .await
            .map_err(|err| UnlockError::Infrastructure(err.to_string()))
    }

    /// Canonical resource identity for a content item. Settlement binds
    /// proofs to exactly this URL.
    pub fn resource_url(&self, id: &str) -> String {
        format!(
            "{}/api/content/{}",
            self.settings.resource_base_url.as_str().trim_end_matches('/'),
            id
        )
    }

    fn challenge(
        &self,
        content: &Content,
        price: AmountValue,
        message: &str,
    ) -> PaymentChallenge {
        PaymentChallenge {
            status_code: 402,
            message: message.to_string(),
            price,
            price_usd: pricing::price_usd(price),
            content_id: content.content_id,
            pay_to: self
                .settings
                .pay_to
                .clone()
                .unwrap_or_else(|| content.creator.clone()),
            network: self.settings.network.clone(),
            chain_id: self.settings.chain_id,
        }
    }
}
