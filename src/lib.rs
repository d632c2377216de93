//! # Insight Gate
//!
//! Backend for a pay-per-unlock content marketplace. A creator publishes
//! an article; a reader must present a payment proof before receiving
//! the full body.
//!
//! ## Payment Flow
//!
//! 1. The client fetches a content item without a payment proof and
//!    receives `402 Payment Required` with the current price, payee, and
//!    network identity.
//! 2. The client pays and resubmits with an `x-payment` proof header.
//! 3. [`verifier::PaymentVerifier`] validates the proof — against the
//!    mock sentinels or through the external settlement oracle,
//!    depending on configuration.
//! 4. On success the gate bumps the unlock counter (raising the price
//!    for later unlocks), records the unlock in the caller's ledger
//!    account, and releases the full body.
//!
//! ## Modules
//!
//! - [`pricing`]: the compounding price function and USD display rate.
//! - [`verifier`]: mode-dispatched payment verification.
//! - [`settlement`] / [`settlement_client`]: the settlement oracle
//!   interface and its HTTP client.
//! - [`ledger`]: per-wallet unlock, creation, and earnings bookkeeping.
//! - [`store`]: the injected content storage abstraction and the
//!   in-memory implementation.
//! - [`gate`]: the unlock protocol orchestration.
//! - [`routes`]: the axum HTTP surface.
//! - [`errors`]: the request-level error taxonomy and response mapping.

pub mod config;
pub mod errors;
pub mod gate;
pub mod ledger;
pub mod pricing;
pub mod routes;
pub mod settlement;
pub mod settlement_client;
pub mod store;
pub mod transport;
pub mod types;
pub mod verifier;
