use crate::domain::intent::{Intent, TransactionResult};
use crate::domain::money::Money;
use crate::domain::ports::{
    CacheInvalidatorBox, FundingGateway, FundingOutcome, TransactionApiBox,
};
use crate::domain::wire::{ApiReply, ApiRequest};
use crate::error::{CheckoutError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Operator-defined bounds on the amount a single intent may carry.
/// Checked client-side before any API call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_amount: Money,
    pub max_amount: Money,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_amount: Money::from_minor(100),
            max_amount: Money::from_minor(50_000_000),
        }
    }
}

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a purchase attempt currently stands.
///
/// The tagged variants make illegal transitions unrepresentable instead of
/// guarded ad hoc: funding a non-pending intent has nowhere to go.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IntentState {
    #[default]
    Idle,
    Submitting,
    /// The backend asked for an exact top-up before it will complete the
    /// action. `required` comes verbatim from the reply.
    AwaitingFunding {
        required: Money,
    },
    /// The funding gateway is collecting the required amount.
    Funding,
    /// Funds secured; the original request is being re-issued.
    Retrying,
    Settled(TransactionResult),
    Failed(FailureKind),
}

/// Classification of a failed attempt. Network failures are retryable with
/// the same correlation id because the backend never acknowledged receipt;
/// the others need a fresh intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    RemoteRejected(String),
    Network(String),
    Funding(String),
}

impl IntentState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::AwaitingFunding { .. } => "awaiting-funding",
            Self::Funding => "funding",
            Self::Retrying => "retrying",
            Self::Settled(_) => "settled",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled(_) | Self::Failed(_))
    }
}

/// Drives one purchase intent through submit → (fund → retry)* → settle.
///
/// One instance per intent. The state machine doubles as the reentrancy
/// guard: a second `submit` or `on_funded` while a call is pending, or after
/// a terminal state, is rejected instead of producing a duplicate charge
/// attempt. Concurrent intents from different screens are independent
/// instances with independent correlation ids.
pub struct TransactionOrchestrator {
    intent: Intent,
    user_id: String,
    state: IntentState,
    api: TransactionApiBox,
    invalidator: CacheInvalidatorBox,
    limits: Limits,
    call_timeout: Duration,
}

impl TransactionOrchestrator {
    pub fn new(
        intent: Intent,
        user_id: impl Into<String>,
        api: TransactionApiBox,
        invalidator: CacheInvalidatorBox,
    ) -> Self {
        Self {
            intent,
            user_id: user_id.into(),
            state: IntentState::Idle,
            api,
            invalidator,
            limits: Limits::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn state(&self) -> &IntentState {
        &self.state
    }

    pub fn correlation_id(&self) -> Uuid {
        self.intent.correlation_id
    }

    /// Submits the intent to the backend.
    ///
    /// Valid from `Idle`, or after a network failure: the backend never saw
    /// the request, so repeating the same correlation id cannot double an
    /// effect. Even a quote with zero net payable goes to the backend; the
    /// wallet may have changed server-side, and only the reply decides
    /// whether funding is required.
    pub async fn submit(&mut self) -> Result<IntentState> {
        match &self.state {
            IntentState::Idle | IntentState::Failed(FailureKind::Network(_)) => {}
            other => {
                return Err(CheckoutError::InvalidTransition {
                    from: other.name(),
                    action: "submit",
                });
            }
        }
        if let Some(amount) = self.intent.amount
            && (amount < self.limits.min_amount || amount > self.limits.max_amount)
        {
            return Err(CheckoutError::Validation(format!(
                "amount {amount} outside operator bounds [{}, {}]",
                self.limits.min_amount, self.limits.max_amount
            )));
        }

        self.transition(IntentState::Submitting);
        let reply = self.dispatch().await;
        self.apply_reply(reply).await
    }

    /// Reports that the funding gateway secured the required amount for
    /// `correlation_id`.
    ///
    /// Only valid from a pending funding state and only for the matching
    /// correlation id; anything else is rejected with no side effects. The
    /// retry re-issues the *identical* request, so the backend completes the
    /// original purchase instead of opening a new one.
    pub async fn on_funded(&mut self, correlation_id: Uuid) -> Result<IntentState> {
        if correlation_id != self.intent.correlation_id {
            return Err(CheckoutError::CorrelationMismatch);
        }
        match &self.state {
            IntentState::AwaitingFunding { .. } | IntentState::Funding => {}
            other => {
                return Err(CheckoutError::InvalidTransition {
                    from: other.name(),
                    action: "on_funded",
                });
            }
        }

        self.transition(IntentState::Retrying);
        let reply = self.dispatch().await;
        self.apply_reply(reply).await
    }

    /// Abandons a pending funding step and returns to the pre-purchase state.
    ///
    /// No backend call is made: funding was never collected, so there is
    /// nothing to roll back. A settlement that already happened stays settled.
    pub fn cancel(&mut self) -> Result<()> {
        match &self.state {
            IntentState::AwaitingFunding { .. } | IntentState::Funding => {
                self.transition(IntentState::Idle);
                Ok(())
            }
            other => Err(CheckoutError::InvalidTransition {
                from: other.name(),
                action: "cancel",
            }),
        }
    }

    /// Runs the whole protocol, driving `gateway` for as many funding cycles
    /// as the backend asks for. A changed requirement on retry goes back
    /// through the gateway with the new amount rather than looping silently,
    /// so the user can always cancel.
    pub async fn run(&mut self, gateway: &dyn FundingGateway) -> Result<TransactionResult> {
        let mut state = self.submit().await?;
        loop {
            match state {
                IntentState::Settled(result) => return Ok(result),
                IntentState::AwaitingFunding { required } => {
                    self.transition(IntentState::Funding);
                    match gateway.collect(required).await? {
                        FundingOutcome::Funded => {
                            state = self.on_funded(self.intent.correlation_id).await?;
                        }
                        FundingOutcome::Cancelled => {
                            self.cancel()?;
                            return Err(CheckoutError::FundingCancelled);
                        }
                        FundingOutcome::Failed(message) => {
                            self.transition(IntentState::Failed(FailureKind::Funding(
                                message.clone(),
                            )));
                            return Err(CheckoutError::FundingFailed(message));
                        }
                    }
                }
                // submit/on_funded return Err for every failure, so nothing
                // else can reach this loop.
                other => {
                    return Err(CheckoutError::InvalidTransition {
                        from: other.name(),
                        action: "run",
                    });
                }
            }
        }
    }

    /// One API call with the intent's stable request, bounded by the call
    /// timeout. A timeout is a network failure, never an indefinite wait.
    async fn dispatch(&self) -> Result<ApiReply> {
        let request = ApiRequest::from_intent(&self.intent);
        debug!(
            action = request.action.as_str(),
            correlation_id = %request.correlation_id,
            "dispatching transaction request"
        );
        match tokio::time::timeout(self.call_timeout, self.api.execute(request)).await {
            Ok(reply) => reply,
            Err(_) => Err(CheckoutError::Network(format!(
                "no response within {:?}",
                self.call_timeout
            ))),
        }
    }

    async fn apply_reply(&mut self, reply: Result<ApiReply>) -> Result<IntentState> {
        match reply {
            Ok(ApiReply::Ok { details }) => {
                if let Some(required) = details.funding_required() {
                    info!(
                        correlation_id = %self.intent.correlation_id,
                        required = %required,
                        "wallet funding required"
                    );
                    self.transition(IntentState::AwaitingFunding { required });
                } else {
                    let result = TransactionResult {
                        correlation_id: self.intent.correlation_id,
                        order_id: details.order_id,
                        affected_count: details.affected_count,
                    };
                    self.invalidator.invalidate(&self.cache_keys()).await?;
                    info!(
                        correlation_id = %result.correlation_id,
                        order_id = result.order_id.as_deref().unwrap_or(""),
                        "intent settled"
                    );
                    self.transition(IntentState::Settled(result));
                }
                Ok(self.state.clone())
            }
            Ok(ApiReply::Error { errors }) => {
                let message = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(
                    correlation_id = %self.intent.correlation_id,
                    %message,
                    "backend rejected intent"
                );
                self.transition(IntentState::Failed(FailureKind::RemoteRejected(
                    message.clone(),
                )));
                Err(CheckoutError::RemoteRejected(message))
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    correlation_id = %self.intent.correlation_id,
                    %message,
                    "transaction call did not complete"
                );
                self.transition(IntentState::Failed(FailureKind::Network(message.clone())));
                Err(CheckoutError::Network(message))
            }
        }
    }

    /// Every resource a settled action could have affected, listed once.
    fn cache_keys(&self) -> Vec<String> {
        vec![
            format!("wallet-balance:{}", self.user_id),
            format!("order-history:{}", self.user_id),
            format!("transaction-log:{}", self.user_id),
        ]
    }

    fn transition(&mut self, next: IntentState) {
        debug!(
            correlation_id = %self.intent.correlation_id,
            from = self.state.name(),
            to = next.name(),
            "state transition"
        );
        self.state = next;
    }
}
