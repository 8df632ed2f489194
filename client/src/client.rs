use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
pub use builder::*;
pub use error::*;
pub use interface::*;
use serde_json::Value;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
pub use types::*;

mod builder;
mod error;
mod interface;
mod types;

const API_KEY_HEADER: &str = "X-API-Key";

/// Toncenter v2 JSON-RPC client.
///
/// Idempotent calls are retried on transient failures; message submission is sent once.
#[derive(Clone)]
pub struct TonCenterClient {
    inner: Arc<Inner>,
}

struct Inner {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    retry_strategy: RetryStrategy,
    next_id: AtomicU64,
}

impl TonCenterClient {
    pub(crate) fn new(
        http_client: reqwest::Client,
        endpoint: &str,
        api_key: Option<String>,
        retry_strategy: RetryStrategy,
    ) -> TonCenterClient {
        let inner = Inner {
            http_client,
            endpoint: endpoint.to_string(),
            api_key,
            retry_strategy,
            next_id: AtomicU64::new(1),
        };
        TonCenterClient {
            inner: Arc::new(inner),
        }
    }

    pub fn builder() -> TonCenterClientBuilder {
        TonCenterClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    async fn retrying_invoke(&self, function: &TonFunction) -> Result<Value, TonRpcError> {
        let fi = FixedInterval::from_millis(self.inner.retry_strategy.interval_ms);
        let strategy = fi.take(self.inner.retry_strategy.max_retries);
        RetryIf::spawn(strategy, || self.do_invoke(function), retry_condition).await
    }

    async fn do_invoke(&self, function: &TonFunction) -> Result<Value, TonRpcError> {
        let method = function.method();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, function);
        log::trace!("-> {}: {}", method, request.params);

        let mut http_request = self.inner.http_client.post(&self.inner.endpoint).json(&request);
        if let Some(api_key) = &self.inner.api_key {
            http_request = http_request.header(API_KEY_HEADER, api_key);
        }
        let response = http_request
            .send()
            .await
            .map_err(|source| TonRpcError::Transport { method, source })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| TonRpcError::Transport { method, source })?;
        log::trace!("<- {} ({}): {}", method, status, body);

        let result = decode_response(method, status, &body);
        if let Err(e) = &result {
            log::debug!("{} failed: {}", method, e);
        }
        result
    }
}

#[async_trait]
impl TonRpcInterface for TonCenterClient {
    async fn invoke(&self, function: &TonFunction) -> Result<Value, TonRpcError> {
        if function.is_idempotent() {
            self.retrying_invoke(function).await
        } else {
            self.do_invoke(function).await
        }
    }
}
