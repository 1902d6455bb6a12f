use crate::domain::ports::TransactionApi;
use crate::domain::wire::{ApiReply, ApiRequest};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Production Transaction API adapter: one JSON POST per action.
///
/// The correlation id is mirrored into an `Idempotence-Key` header so
/// intermediaries can deduplicate a post-funding retry the same way the
/// backend does. Transport and decode failures surface as network errors,
/// which the orchestrator treats as retryable.
pub struct HttpTransactionApi {
    client: Client,
    endpoint: String,
}

impl HttpTransactionApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TransactionApi for HttpTransactionApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Idempotence-Key", request.correlation_id.to_string())
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;
        response
            .json::<ApiReply>()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))
    }
}
