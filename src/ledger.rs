//! Per-wallet unlock bookkeeping.
//!
//! Accounts are keyed by the lower-cased wallet address and created
//! lazily. Records are append-only; every mutation runs under a single
//! write lock, so appends are atomic per key.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::types::{AmountValue, UnlockRecord, UserAccount, UserStats};

#[derive(Debug, Default)]
pub struct UnlockLedger {
    users: RwLock<HashMap<String, UserAccount>>,
}

impl UnlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create(&self, address: &str) -> UserAccount {
        let mut users = self.users.write().await;
        entry(&mut users, address).clone()
    }

    /// Record a paid unlock and add its price to the wallet's total
    /// spend. Callers invoke this at most once per successful
    /// verification; [`UnlockLedger::has_unlocked`] exposes the result
    /// for them to confirm.
    pub async fn record_unlock(
        &self,
        address: &str,
        content_id: u64,
        transaction_hash: &str,
        price: AmountValue,
        referrer: Option<String>,
    ) {
        let mut users = self.users.write().await;
        let user = entry(&mut users, address);

        user.unlocked_contents.push(UnlockRecord {
            content_id,
            transaction_hash: transaction_hash.to_string(),
            price,
            referrer,
            unlocked_at: Utc::now(),
        });
        user.total_spent += price;
    }

    pub async fn record_creation(&self, address: &str, content_id: u64) {
        let mut users = self.users.write().await;
        entry(&mut users, address).created_contents.push(content_id);
    }

    /// Credit already-settled earnings. Revenue splits are computed by
    /// the settlement layer; this only records the amounts it reports.
    pub async fn record_earnings(&self, address: &str, amount: AmountValue, is_referral: bool) {
        let mut users = self.users.write().await;
        let user = entry(&mut users, address);

        if is_referral {
            user.referral_earnings += amount;
        }
        user.total_earned += amount;
    }

    pub async fn has_unlocked(&self, address: &str, content_id: u64) -> bool {
        self.users
            .read()
            .await
            .get(&normalize(address))
            .is_some_and(|user| {
                user.unlocked_contents
                    .iter()
                    .any(|record| record.content_id == content_id)
            })
    }

    pub async fn unlocked_contents(&self, address: &str) -> Vec<UnlockRecord> {
        self.users
            .read()
            .await
            .get(&normalize(address))
            .map(|user| user.unlocked_contents.clone())
            .unwrap_or_default()
    }

    /// Derived totals. Unknown addresses read as zeroed stats without
    /// creating an account.
    pub async fn stats(&self, address: &str) -> UserStats {
        let users = self.users.read().await;
        match users.get(&normalize(address)) {
            Some(user) => UserStats {
                total_unlocked: user.unlocked_contents.len(),
                total_created: user.created_contents.len(),
                total_spent: user.total_spent,
                total_earned: user.total_earned,
                referral_earnings: user.referral_earnings,
            },
            None => UserStats::default(),
        }
    }
}

fn normalize(address: &str) -> String {
    address.to_lowercase()
}

fn entry<'a>(users: &'a mut HashMap<String, UserAccount>, address: &str) -> &'a mut UserAccount {
    let key = normalize(address);
    users
        .entry(key.clone())
        .or_insert_with(|| UserAccount::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlock_records_accumulate_spend() {
        let ledger = UnlockLedger::new();
        ledger
            .record_unlock("0xAlice", 1, "0xtx1", AmountValue::from(100u64), None)
            .await;

        let stats = ledger.stats("0xAlice").await;
        assert_eq!(stats.total_unlocked, 1);
        assert_eq!(stats.total_spent, AmountValue::from(100u64));

        ledger
            .record_unlock("0xAlice", 2, "0xtx2", AmountValue::from(50u64), None)
            .await;

        let stats = ledger.stats("0xAlice").await;
        assert_eq!(stats.total_unlocked, 2);
        assert_eq!(stats.total_spent, AmountValue::from(150u64));
    }

    #[tokio::test]
    async fn addresses_normalize_to_one_account() {
        let ledger = UnlockLedger::new();
        let upper = ledger.get_or_create("0xABC").await;
        let lower = ledger.get_or_create("0xabc").await;

        assert_eq!(upper.address, "0xabc");
        assert_eq!(lower.address, "0xabc");

        ledger
            .record_unlock("0xABC", 5, "0xtx", AmountValue::from(10u64), None)
            .await;
        assert!(ledger.has_unlocked("0xabc", 5).await);
    }

    #[tokio::test]
    async fn has_unlocked_scans_records() {
        let ledger = UnlockLedger::new();
        assert!(!ledger.has_unlocked("0xalice", 1).await);

        ledger
            .record_unlock("0xalice", 1, "0xtx", AmountValue::from(10u64), None)
            .await;

        assert!(ledger.has_unlocked("0xalice", 1).await);
        assert!(!ledger.has_unlocked("0xalice", 2).await);
        assert!(!ledger.has_unlocked("0xbob", 1).await);
    }

    #[tokio::test]
    async fn creations_have_no_financial_effect() {
        let ledger = UnlockLedger::new();
        ledger.record_creation("0xalice", 9).await;

        let stats = ledger.stats("0xalice").await;
        assert_eq!(stats.total_created, 1);
        assert_eq!(stats.total_spent, AmountValue::ZERO);
        assert_eq!(stats.total_earned, AmountValue::ZERO);
    }

    #[tokio::test]
    async fn referral_earnings_also_count_toward_total() {
        let ledger = UnlockLedger::new();
        ledger
            .record_earnings("0xref", AmountValue::from(85u64), false)
            .await;
        ledger
            .record_earnings("0xref", AmountValue::from(10u64), true)
            .await;

        let stats = ledger.stats("0xref").await;
        assert_eq!(stats.total_earned, AmountValue::from(95u64));
        assert_eq!(stats.referral_earnings, AmountValue::from(10u64));
    }

    #[tokio::test]
    async fn unknown_addresses_read_as_zeroed() {
        let ledger = UnlockLedger::new();
        let stats = ledger.stats("0xnobody").await;

        assert_eq!(stats.total_unlocked, 0);
        assert_eq!(stats.total_spent, AmountValue::ZERO);
        assert!(ledger.unlocked_contents("0xnobody").await.is_empty());
    }
}
