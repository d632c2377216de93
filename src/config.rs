//! Configuration from CLI arguments and environment variables.

use std::net::SocketAddr;

use clap::Parser;
use url::Url;

/// Pay-per-unlock content marketplace backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "insight-gate")]
#[command(about = "Pay-per-unlock content marketplace backend")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// Wallet receiving unlock payments; 402 challenges fall back to
    /// each content's creator when unset
    #[arg(long, env = "RECIPIENT_WALLET")]
    pub recipient_wallet: Option<String>,

    /// Payment network name advertised in 402 challenges
    #[arg(long, env = "NETWORK", default_value = "monad-testnet")]
    pub network: String,

    /// Chain id advertised in 402 challenges
    #[arg(long, env = "CHAIN_ID", default_value = "10143")]
    pub chain_id: u64,

    /// Settlement facilitator base URL
    #[arg(long, env = "FACILITATOR_URL")]
    pub facilitator_url: Option<Url>,

    /// Settlement facilitator credential
    #[arg(long, env = "FACILITATOR_API_KEY")]
    pub facilitator_api_key: Option<String>,

    /// Public base URL payment proofs are bound against
    #[arg(long, env = "RESOURCE_BASE_URL", default_value = "http://localhost:3001")]
    pub resource_base_url: Url,

    /// Settlement request timeout in milliseconds
    #[arg(long, env = "SETTLE_TIMEOUT_MS", default_value = "30000")]
    pub settle_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Facilitator settlement runs only with both a URL and a
    /// credential; anything less falls back to mock verification.
    pub fn facilitator(&self) -> Option<(Url, String)> {
        match (&self.facilitator_url, &self.facilitator_api_key) {
            (Some(url), Some(key)) => Some((url.clone(), key.clone())),
            _ => None,
        }
    }
}
