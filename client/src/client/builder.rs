use std::time::Duration;

use crate::client::{
    RetryStrategy, TonCenterClient, TonRpcError, DEFAULT_REQUEST_TIMEOUT_MS, MAINNET_ENDPOINT,
    TESTNET_ENDPOINT,
};

pub struct TonCenterClientBuilder {
    endpoint: String,
    api_key: Option<String>,
    retry_strategy: RetryStrategy,
    request_timeout: Duration,
}

impl TonCenterClientBuilder {
    pub fn new() -> Self {
        TonCenterClientBuilder {
            endpoint: MAINNET_ENDPOINT.to_string(),
            api_key: None,
            retry_strategy: RetryStrategy::default(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    pub fn with_endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_testnet(&mut self) -> &mut Self {
        self.endpoint = TESTNET_ENDPOINT.to_string();
        self
    }

    pub fn with_api_key(&mut self, api_key: Option<String>) -> &mut Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_retry_strategy(&mut self, retry_strategy: &RetryStrategy) -> &mut Self {
        self.retry_strategy = retry_strategy.clone();
        self
    }

    pub fn with_request_timeout(&mut self, request_timeout: Duration) -> &mut Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn build(&self) -> Result<TonCenterClient, TonRpcError> {
        if self.endpoint.is_empty() {
            return Err(TonRpcError::IllegalArgument {
                message: "endpoint must not be empty".to_string(),
            });
        }
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|source| TonRpcError::Transport {
                method: "build",
                source,
            })?;
        Ok(TonCenterClient::new(
            http_client,
            &self.endpoint,
            self.api_key.clone(),
            self.retry_strategy.clone(),
        ))
    }
}

impl Default for TonCenterClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
