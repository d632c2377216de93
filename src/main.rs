use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use http::{HeaderName, HeaderValue};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use insight_gate::config::Args;
use insight_gate::gate::{GateSettings, UnlockGate};
use insight_gate::ledger::UnlockLedger;
use insight_gate::routes;
use insight_gate::settlement_client::RemoteSettlementClient;
use insight_gate::store::MemoryContentStore;
use insight_gate::verifier::{PaymentVerifier, VerificationMode};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("insight_gate={},info", args.log_level).into()),
        )
        .init();

    let mode = match args.facilitator() {
        Some((url, api_key)) => {
            info!(%url, "payment verification in facilitator mode");
            let client = RemoteSettlementClient::new_from_url(
                url,
                Duration::from_millis(args.settle_timeout_ms),
            )
            .expect("Failed to build settlement client")
            .settle_header(
                &HeaderName::from_static("x-api-key"),
                &HeaderValue::from_str(&api_key)
                    .expect("FACILITATOR_API_KEY must be a valid header value"),
            );
            VerificationMode::Facilitator(client)
        }
        None => {
            warn!("settlement credentials not set, payment verification running in mock mode");
            VerificationMode::Mock
        }
    };

    let verifier = PaymentVerifier::builder()
        .mode(mode)
        .pay_to(args.recipient_wallet.clone().unwrap_or_default())
        .network(args.network.clone())
        .build();

    let settings = GateSettings::builder()
        .maybe_pay_to(args.recipient_wallet.clone())
        .network(args.network.clone())
        .chain_id(args.chain_id)
        .resource_base_url(args.resource_base_url.clone())
        .build();

    let gate = Arc::new(
        UnlockGate::builder()
            .store(Arc::new(MemoryContentStore::new()))
            .ledger(Arc::new(UnlockLedger::new()))
            .verifier(verifier)
            .settings(settings)
            .build(),
    );

    let app = routes::router(gate);

    info!(
        listen = %args.listen,
        network = %args.network,
        chain_id = args.chain_id,
        "starting insight-gate"
    );
    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app).await.expect("Server failed");
}
