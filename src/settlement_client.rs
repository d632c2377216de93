use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::settlement::{SettlementOracle, SettlementReceipt, SettlementRequest};

/// A remote settlement oracle reached over HTTP.
///
/// Settlement runs as a JSON POST against `{base_url}/settle` with the
/// configured headers. Every call carries the client-wide timeout so a
/// stalled oracle cannot hang the unlock path.
#[derive(Debug, Clone)]
pub struct RemoteSettlementClient {
    pub base_url: Url,
    pub client: reqwest::Client,
    pub settle_headers: HeaderMap,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteSettlementError {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP request error: {0}")]
    HttpRequestError(#[from] reqwest::Error),
}

impl RemoteSettlementClient {
    pub fn new_from_url(base_url: Url, timeout: Duration) -> Result<Self, RemoteSettlementError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(RemoteSettlementClient {
            base_url,
            client,
            settle_headers: HeaderMap::new(),
        })
    }

    pub fn settle_header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.settle_headers.insert(key, value.to_owned());
        self
    }
}

impl SettlementOracle for RemoteSettlementClient {
    type Error = RemoteSettlementError;

    async fn settle(&self, request: SettlementRequest) -> Result<SettlementReceipt, Self::Error> {
        let receipt = self
            .client
            .post(self.base_url.join("settle")?)
            .headers(self.settle_headers.clone())
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        Ok(receipt)
    }
}
