//! HTTP surface of the marketplace.
//!
//! The unlock protocol lives entirely on `GET /api/content/{id}`:
//! without an `x-payment` header the response is a 402 challenge, with
//! one the proof is verified and the full body released. Everything else
//! is catalog, user bookkeeping, and payment plumbing around it.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::HeaderMap;
use serde::Deserialize;

use crate::errors::UnlockError;
use crate::gate::UnlockGate;
use crate::settlement::SettlementOracle;
use crate::store::ContentStore;
use crate::transport::{PaymentStatus, UnlockCheck, UnlockedContent, VerifyPaymentBody};
use crate::types::{Content, ContentDraft, ContentPreview, UnlockRecord, UserAccount, UserStats};
use crate::verifier::VerificationResult;

/// Shared handler state.
pub type SharedGate<C, S> = Arc<UnlockGate<C, S>>;

const PAYMENT_HEADER: &str = "x-payment";
const WALLET_HEADER: &str = "x-wallet-address";

pub fn router<C, S>(gate: SharedGate<C, S>) -> Router
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/api/content",
            get(list_contents::<C, S>).post(create_content::<C, S>),
        )
        .route("/api/content/{id}", get(get_full_content::<C, S>))
        .route("/api/content/{id}/preview", get(get_content_preview::<C, S>))
        .route("/api/payment/status", get(payment_status::<C, S>))
        .route("/api/payment/verify", post(verify_payment::<C, S>))
        .route("/api/user/unlocked", get(user_unlocked::<C, S>))
        .route("/api/user/stats", get(user_stats::<C, S>))
        .route("/api/user/profile", get(user_profile::<C, S>))
        .route("/api/user/check-unlock/{content_id}", get(check_unlock::<C, S>))
        .with_state(gate)
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    category: Option<String>,
    search: Option<String>,
}

/// Catalog listing: previews only, most-unlocked first.
async fn list_contents<C, S>(
    State(gate): State<SharedGate<C, S>>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<ContentPreview>>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let mut contents = gate.store.list().await;

    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        contents.retain(|content| {
            content.title.to_lowercase().contains(&needle)
                || content.description.to_lowercase().contains(&needle)
                || content.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        });
    } else if let Some(category) = query.category.as_deref() {
        contents.retain(|content| content.category.eq_ignore_ascii_case(category));
    }

    contents.sort_by(|a, b| b.unlock_count.cmp(&a.unlock_count));
    Json(contents.iter().map(ContentPreview::of).collect())
}

async fn create_content<C, S>(
    State(gate): State<SharedGate<C, S>>,
    headers: HeaderMap,
    Json(draft): Json<ContentDraft>,
) -> Result<Json<Content>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let wallet = header_value(&headers, WALLET_HEADER);
    let content = gate.create_content(draft, wallet.as_deref()).await?;
    Ok(Json(content))
}

/// The payment-gated endpoint.
async fn get_full_content<C, S>(
    State(gate): State<SharedGate<C, S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UnlockedContent>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let proof = header_value(&headers, PAYMENT_HEADER);
    let wallet = header_value(&headers, WALLET_HEADER);

    let unlocked = gate
        .request_content(&id, proof.as_deref(), wallet.as_deref())
        .await?;
    Ok(Json(unlocked))
}

async fn get_content_preview<C, S>(
    State(gate): State<SharedGate<C, S>>,
    Path(id): Path<String>,
) -> Result<Json<ContentPreview>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let content = gate
        .store
        .get(&id)
        .await
        .ok_or(UnlockError::NotFound(id))?;
    Ok(Json(ContentPreview::of(&content)))
}

async fn payment_status<C, S>(State(gate): State<SharedGate<C, S>>) -> Json<PaymentStatus>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    Json(PaymentStatus {
        enabled: gate.verifier.is_facilitator(),
        network: gate.settings.network.clone(),
        chain_id: gate.settings.chain_id,
        recipient: gate
            .settings
            .pay_to
            .clone()
            .unwrap_or_else(|| "not-configured".to_string()),
    })
}

async fn verify_payment<C, S>(
    State(gate): State<SharedGate<C, S>>,
    headers: HeaderMap,
    Json(body): Json<VerifyPaymentBody>,
) -> Result<Json<VerificationResult>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let proof = header_value(&headers, PAYMENT_HEADER)
        .or(body.payment_data)
        .ok_or_else(|| UnlockError::InvalidInput("Payment data required".to_string()))?;

    let verdict = gate
        .verify_payment(&proof, &body.content_id, body.amount)
        .await?;
    Ok(Json(verdict.into()))
}

async fn user_unlocked<C, S>(
    State(gate): State<SharedGate<C, S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UnlockRecord>>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let wallet = require_wallet(&headers)?;
    Ok(Json(gate.ledger.unlocked_contents(&wallet).await))
}

async fn user_stats<C, S>(
    State(gate): State<SharedGate<C, S>>,
    headers: HeaderMap,
) -> Result<Json<UserStats>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let wallet = require_wallet(&headers)?;
    Ok(Json(gate.ledger.stats(&wallet).await))
}

async fn user_profile<C, S>(
    State(gate): State<SharedGate<C, S>>,
    headers: HeaderMap,
) -> Result<Json<UserAccount>, UnlockError>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let wallet = require_wallet(&headers)?;
    Ok(Json(gate.ledger.get_or_create(&wallet).await))
}

async fn check_unlock<C, S>(
    State(gate): State<SharedGate<C, S>>,
    Path(content_id): Path<u64>,
    headers: HeaderMap,
) -> Json<UnlockCheck>
where
    C: ContentStore + Send + Sync + 'static,
    S: SettlementOracle + Send + Sync + 'static,
{
    let unlocked = match header_value(&headers, WALLET_HEADER) {
        Some(wallet) => gate.ledger.has_unlocked(&wallet, content_id).await,
        None => false,
    };
    Json(UnlockCheck { unlocked })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

fn require_wallet(headers: &HeaderMap) -> Result<String, UnlockError> {
    header_value(headers, WALLET_HEADER)
        .ok_or_else(|| UnlockError::InvalidInput("Wallet address required".to_string()))
}
