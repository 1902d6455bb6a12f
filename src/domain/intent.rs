use super::money::Money;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The kind of paid action the user initiated. Each maps to a stable action
/// name on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentKind {
    CartCheckout,
    GroupJoin,
    BillPayment,
    RentalBooking,
    WalletTopup,
}

impl IntentKind {
    pub fn action(&self) -> &'static str {
        match self {
            Self::CartCheckout => "cart-checkout",
            Self::GroupJoin => "group-join",
            Self::BillPayment => "bill-payment",
            Self::RentalBooking => "rental-booking",
            Self::WalletTopup => "wallet-topup",
        }
    }
}

/// An immutable description of what the user wants to pay for.
///
/// Lives in memory for the duration of one orchestration and is discarded on
/// settlement, failure or cancellation; it is never persisted across reloads.
/// The correlation id is generated once per user action and reused across
/// retries, so the backend treats a resubmission after funding as
/// continuation of the same purchase rather than a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub kind: IntentKind,
    pub subject_id: String,
    /// The amount the action charges, when the client knows it up front
    /// (bill payments, top-ups). Validated against operator limits before
    /// any API call.
    pub amount: Option<Money>,
    /// Extra scalar fields the action needs on the wire.
    pub payload: Map<String, Value>,
    pub correlation_id: Uuid,
}

impl Intent {
    pub fn new(kind: IntentKind, subject_id: impl Into<String>, amount: Option<Money>) -> Self {
        Self {
            kind,
            subject_id: subject_id.into(),
            amount,
            payload: Map::new(),
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Adds a scalar payload field. The API contract only carries scalars;
    /// anything richer belongs to the rendering layer.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// Terminal outcome of a settled intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub correlation_id: Uuid,
    pub order_id: Option<String>,
    pub affected_count: u64,
}
