//! End-to-end exercises of the 402 unlock protocol over the HTTP router,
//! running the verifier in mock mode.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use insight_gate::gate::{GateSettings, UnlockGate};
use insight_gate::ledger::UnlockLedger;
use insight_gate::routes;
use insight_gate::settlement_client::RemoteSettlementClient;
use insight_gate::store::MemoryContentStore;
use insight_gate::verifier::{PaymentVerifier, VerificationMode};

const CREATOR: &str = "0xCreatorWallet";
const READER: &str = "0xReaderWallet";

fn test_router() -> Router {
    let verifier: PaymentVerifier<RemoteSettlementClient> = PaymentVerifier::builder()
        .mode(VerificationMode::Mock)
        .pay_to("")
        .network("monad-testnet")
        .build();

    let settings = GateSettings::builder()
        .network("monad-testnet")
        .chain_id(10143)
        .resource_base_url(Url::parse("http://localhost:3001").unwrap())
        .build();

    let gate = Arc::new(
        UnlockGate::builder()
            .store(Arc::new(MemoryContentStore::new()))
            .ledger(Arc::new(UnlockLedger::new()))
            .verifier(verifier)
            .settings(settings)
            .build(),
    );

    routes::router(gate)
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn draft_body(base_price: &str) -> String {
    json!({
        "title": "Parallel Execution Strategies",
        "description": "How to exploit a 10k TPS chain",
        "category": "Trading",
        "preview": "The free teaser...",
        "fullContent": "The entire paid article body.",
        "basePrice": base_price,
        "tags": ["trading", "defi"],
    })
    .to_string()
}

async fn create_content(app: &Router, base_price: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/content")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-wallet-address", CREATOR)
                .body(Body::from(draft_body(base_price)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn fetch_content(app: &Router, id: &str, proof: Option<&str>, wallet: Option<&str>) -> Response<Body> {
    let mut request = Request::builder()
        .method("GET")
        .uri(format!("/api/content/{id}"));
    if let Some(proof) = proof {
        request = request.header("x-payment", proof);
    }
    if let Some(wallet) = wallet {
        request = request.header("x-wallet-address", wallet);
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn get_json(app: &Router, uri: &str, wallet: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(wallet) = wallet {
        request = request.header("x-wallet-address", wallet);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn missing_proof_gets_a_402_challenge() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, None, None).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let challenge = body_json(response).await;
    assert_eq!(challenge["statusCode"], 402);
    assert_eq!(challenge["price"], "100");
    assert_eq!(challenge["contentId"], 1);
    assert_eq!(challenge["network"], "monad-testnet");
    assert_eq!(challenge["chainId"], 10143);
    // No configured recipient: the creator is the payee.
    assert_eq!(challenge["payTo"], CREATOR);
}

#[tokio::test]
async fn mock_proof_releases_the_full_body_once_counted() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, Some("mock-payment-success"), Some(READER)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let unlocked = body_json(response).await;
    assert_eq!(unlocked["unlocked"], true);
    assert_eq!(unlocked["fullContent"], "The entire paid article body.");
    assert_eq!(unlocked["unlockCount"], 1);
    assert!(
        unlocked["transactionHash"].as_str().unwrap().starts_with("0x"),
        "mock unlocks synthesize a transaction hash"
    );

    // The counter moved by exactly one, visible through the free preview.
    let preview = body_json(get_json(&app, &format!("/api/content/{id}/preview"), None).await).await;
    assert_eq!(preview["unlockCount"], 1);

    // And the reader's ledger account saw the charge.
    let stats = body_json(get_json(&app, "/api/user/stats", Some(READER)).await).await;
    assert_eq!(stats["totalUnlocked"], 1);
    assert_eq!(stats["totalSpent"], "100");
}

#[tokio::test]
async fn transaction_hash_proofs_are_echoed() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, Some("0xabc123"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let unlocked = body_json(response).await;
    assert_eq!(unlocked["transactionHash"], "0xabc123");
}

#[tokio::test]
async fn chain_verified_sentinel_bypasses_payment() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, Some("chain-verified"), Some(READER)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let unlocked = body_json(response).await;
    assert_eq!(unlocked["transactionHash"], "on-chain-verified");
}

#[tokio::test]
async fn invalid_proof_is_rejected_without_mutation() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, Some("not-a-valid-proof"), Some(READER)).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let challenge = body_json(response).await;
    assert_eq!(challenge["message"], "Invalid payment data in mock mode");

    let preview = body_json(get_json(&app, &format!("/api/content/{id}/preview"), None).await).await;
    assert_eq!(preview["unlockCount"], 0);

    let stats = body_json(get_json(&app, "/api/user/stats", Some(READER)).await).await;
    assert_eq!(stats["totalUnlocked"], 0);
}

#[tokio::test]
async fn anonymous_unlock_leaves_the_ledger_untouched() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    let response = fetch_content(&app, id, Some("mock-payment-success"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Creation is the only thing on the creator's account; nobody spent.
    let stats = body_json(get_json(&app, "/api/user/stats", Some(CREATOR)).await).await;
    assert_eq!(stats["totalCreated"], 1);
    assert_eq!(stats["totalUnlocked"], 0);
    assert_eq!(stats["totalSpent"], "0");
}

#[tokio::test]
async fn price_steps_up_after_ten_unlocks() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    for n in 0..10 {
        let response = fetch_content(&app, id, Some(&format!("0xproof{n}")), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = fetch_content(&app, id, None, None).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let challenge = body_json(response).await;
    assert_eq!(challenge["price"], "110");
}

#[tokio::test]
async fn unlock_response_reports_the_next_price() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    for n in 0..9 {
        fetch_content(&app, id, Some(&format!("0xproof{n}")), None).await;
    }

    // The 10th unlock is still charged at the base rate, but the counter
    // crossing 10 raises the advertised price for the next one.
    let response = fetch_content(&app, id, Some("0xtenth"), Some(READER)).await;
    let unlocked = body_json(response).await;
    assert_eq!(unlocked["unlockCount"], 10);
    assert_eq!(unlocked["currentPrice"], "110");

    let records = body_json(get_json(&app, "/api/user/unlocked", Some(READER)).await).await;
    assert_eq!(records[0]["price"], "100");
}

#[tokio::test]
async fn creation_requires_a_wallet_address() {
    let app = test_router();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/content")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(draft_body("100")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Wallet address required");
}

#[tokio::test]
async fn unknown_content_is_404() {
    let app = test_router();
    let response = fetch_content(&app, "no-such-id", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn standalone_verification_endpoint() {
    let app = test_router();

    let verify = |payment_data: &str| {
        let app = app.clone();
        let body = json!({
            "paymentData": payment_data,
            "contentId": "1",
            "amount": "100",
        })
        .to_string();
        async move {
            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/payment/verify")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await
        }
    };

    let ok = verify("mock-payment-success").await;
    assert_eq!(ok["success"], true);
    assert!(ok["transactionHash"].as_str().unwrap().starts_with("0x"));

    let rejected = verify("garbage").await;
    assert_eq!(rejected["success"], false);
    assert_eq!(rejected["error"], "Invalid payment data in mock mode");
}

#[tokio::test]
async fn user_surface_requires_a_wallet_header() {
    let app = test_router();

    for uri in ["/api/user/unlocked", "/api/user/stats", "/api/user/profile"] {
        let response = get_json(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let check = body_json(get_json(&app, "/api/user/check-unlock/1", None).await).await;
    assert_eq!(check["unlocked"], false);
}

#[tokio::test]
async fn check_unlock_reflects_the_ledger() {
    let app = test_router();
    let content = create_content(&app, "100").await;
    let id = content["id"].as_str().unwrap();

    fetch_content(&app, id, Some("0xpaid"), Some(READER)).await;

    let check = body_json(get_json(&app, "/api/user/check-unlock/1", Some(READER)).await).await;
    assert_eq!(check["unlocked"], true);

    let other = body_json(get_json(&app, "/api/user/check-unlock/2", Some(READER)).await).await;
    assert_eq!(other["unlocked"], false);
}

#[tokio::test]
async fn catalog_lists_previews_without_the_paid_body() {
    let app = test_router();
    create_content(&app, "100").await;

    let response = get_json(&app, "/api/content", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    let items = listing.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["currentPrice"], "100");
    assert!(items[0].get("fullContent").is_none());

    let filtered = body_json(get_json(&app, "/api/content?category=trading", None).await).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let searched = body_json(get_json(&app, "/api/content?search=parallel", None).await).await;
    assert_eq!(searched.as_array().unwrap().len(), 1);

    let missed = body_json(get_json(&app, "/api/content?search=nomatch", None).await).await;
    assert_eq!(missed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn payment_status_reports_mock_mode() {
    let app = test_router();
    let status = body_json(get_json(&app, "/api/payment/status", None).await).await;

    assert_eq!(status["enabled"], false);
    assert_eq!(status["network"], "monad-testnet");
    assert_eq!(status["chainId"], 10143);
    assert_eq!(status["recipient"], "not-configured");
}
