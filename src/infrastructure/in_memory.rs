use crate::domain::money::Money;
use crate::domain::ports::{CacheInvalidator, FundingGateway, FundingOutcome, TransactionApi};
use crate::domain::wire::{ApiReply, ApiRequest, ReplyDetails};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum Script {
    Reply(ApiReply),
    Network(String),
    /// Never answers, so the orchestrator's call timeout fires.
    Hang,
}

/// A Transaction API double that replays a scripted sequence of replies and
/// records every request it receives.
///
/// `Arc<Mutex<..>>` keeps clones sharing one script, so a test can hold a
/// handle while the orchestrator owns the boxed port.
#[derive(Default, Clone)]
pub struct ScriptedApi {
    script: Arc<Mutex<VecDeque<Script>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_reply(&self, reply: ApiReply) {
        self.script.lock().await.push_back(Script::Reply(reply));
    }

    pub async fn push_settled(&self, order_id: &str) {
        self.push_reply(ApiReply::Ok {
            details: ReplyDetails {
                order_id: Some(order_id.to_owned()),
                affected_count: 1,
                amount_required_minor_units: None,
            },
        })
        .await;
    }

    pub async fn push_funding_required(&self, minor_units: u64) {
        self.push_reply(ApiReply::Ok {
            details: ReplyDetails {
                amount_required_minor_units: Some(minor_units),
                ..Default::default()
            },
        })
        .await;
    }

    pub async fn push_rejection(&self, message: &str) {
        self.push_reply(ApiReply::Error {
            errors: vec![crate::domain::wire::ApiError {
                message: message.to_owned(),
            }],
        })
        .await;
    }

    pub async fn push_network_error(&self, message: &str) {
        self.script
            .lock()
            .await
            .push_back(Script::Network(message.to_owned()));
    }

    pub async fn push_hang(&self) {
        self.script.lock().await.push_back(Script::Hang);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl TransactionApi for ScriptedApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiReply> {
        self.requests.lock().await.push(request);
        let next = self.script.lock().await.pop_front();
        match next {
            Some(Script::Reply(reply)) => Ok(reply),
            Some(Script::Network(message)) => Err(CheckoutError::Network(message)),
            Some(Script::Hang) => Ok(std::future::pending::<ApiReply>().await),
            None => Err(CheckoutError::Network("script exhausted".to_owned())),
        }
    }
}

/// A funding gateway double that replays scripted outcomes and records the
/// amount each funding cycle asked for.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    outcomes: Arc<Mutex<VecDeque<FundingOutcome>>>,
    opened_for: Arc<Mutex<Vec<Money>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_outcome(&self, outcome: FundingOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// The required amounts the orchestrator surfaced, one per cycle.
    pub async fn opened_for(&self) -> Vec<Money> {
        self.opened_for.lock().await.clone()
    }
}

#[async_trait]
impl FundingGateway for ScriptedGateway {
    async fn collect(&self, amount: Money) -> Result<FundingOutcome> {
        self.opened_for.lock().await.push(amount);
        let outcome = self.outcomes.lock().await.pop_front();
        // An unscripted open behaves like the user closing the widget.
        Ok(outcome.unwrap_or(FundingOutcome::Cancelled))
    }
}

/// A cache invalidator that captures every key batch it is handed.
#[derive(Default, Clone)]
pub struct RecordingInvalidator {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, keys: &[String]) -> Result<()> {
        self.batches.lock().await.push(keys.to_vec());
        Ok(())
    }
}
