//! Dynamic pricing: every 10 unlocks raises the price 10%, compounding.
//!
//! The same formula runs on-chain, so this must stay integer arithmetic
//! with truncation at each step. Floating point would drift from the
//! contract after a handful of increments.

use alloy_primitives::U256;

use crate::types::AmountValue;

/// Unlocks per price step.
const UNLOCKS_PER_STEP: u64 = 10;

/// Illustrative USD rate for one native token. Not an oracle feed.
const NATIVE_TOKEN_USD: u64 = 10;

/// Current price for a content item given its unlock count.
///
/// Pure and deterministic. The step boundary sits exactly at multiples of
/// 10: the 10th unlock is still charged at the pre-increase rate because
/// the counter is incremented after settlement.
pub fn compute_price(base_price: AmountValue, unlock_count: u64) -> AmountValue {
    let increments = unlock_count / UNLOCKS_PER_STEP;
    let mut price = base_price.0;

    for _ in 0..increments {
        price = price * U256::from(110) / U256::from(100);
    }

    AmountValue(price)
}

/// Display-format USD value for a smallest-unit amount, at the fixed
/// illustrative rate, truncated to four decimals.
pub fn price_usd(amount: AmountValue) -> String {
    let base_units = U256::from(10u64).pow(U256::from(18u64));
    let ten_thousandths = amount.0 * U256::from(NATIVE_TOKEN_USD) * U256::from(10_000u64) / base_units;

    let dollars = ten_thousandths / U256::from(10_000u64);
    let frac = (ten_thousandths % U256::from(10_000u64)).to::<u64>();
    format!("${dollars}.{frac:04}")
}
