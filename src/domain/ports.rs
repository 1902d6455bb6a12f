use super::money::Money;
use super::wire::{ApiReply, ApiRequest};
use crate::error::Result;
use async_trait::async_trait;

/// The single remote endpoint behind every paid action.
///
/// Adapters translate transport failures into `CheckoutError::Network`; a
/// backend rejection is a regular `ApiReply::Error`, not an `Err`.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply>;
}

/// Outcome of one funding attempt, as reported by the top-up widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingOutcome {
    Funded,
    Cancelled,
    Failed(String),
}

/// The wallet top-up widget. The orchestrator never inspects how funds are
/// collected; it only reacts to the reported outcome.
#[async_trait]
pub trait FundingGateway: Send + Sync {
    async fn collect(&self, amount: Money) -> Result<FundingOutcome>;
}

/// Marks cached resources stale after a settlement so every subscribed view
/// refetches. Keys name logical resources, e.g. `wallet-balance:{user}`.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, keys: &[String]) -> Result<()>;
}

pub type TransactionApiBox = Box<dyn TransactionApi>;
pub type FundingGatewayBox = Box<dyn FundingGateway>;
pub type CacheInvalidatorBox = Box<dyn CacheInvalidator>;
