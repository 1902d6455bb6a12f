use super::intent::Intent;
use super::money::Money;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A Transaction API request. One shape for every paid action; the action
/// name selects the backend behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub action: String,
    pub correlation_id: Uuid,
    pub payload: Map<String, Value>,
}

impl ApiRequest {
    /// Builds the wire request for an intent. Building twice for the same
    /// intent yields byte-identical requests, which is what makes a retry
    /// after funding a continuation instead of a new purchase.
    pub fn from_intent(intent: &Intent) -> Self {
        let mut payload = intent.payload.clone();
        payload.insert("subjectId".into(), Value::from(intent.subject_id.clone()));
        if let Some(amount) = intent.amount {
            payload.insert("amountMinorUnits".into(), Value::from(amount.to_minor()));
        }
        Self {
            action: intent.kind.action().to_owned(),
            correlation_id: intent.correlation_id,
            payload,
        }
    }
}

/// A Transaction API reply, keyed on the `status` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiReply {
    Ok { details: ReplyDetails },
    Error { errors: Vec<ApiError> },
}

/// Detail block of a successful reply. All fields are optional on the wire;
/// missing fields default so old backend versions keep parsing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplyDetails {
    pub order_id: Option<String>,
    pub affected_count: u64,
    pub amount_required_minor_units: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ReplyDetails {
    /// A present `amountRequiredMinorUnits > 0` is the sole signal that the
    /// wallet must be funded; absent or zero means the action completed.
    pub fn funding_required(&self) -> Option<Money> {
        match self.amount_required_minor_units {
            Some(units) if units > 0 => Some(Money::from_minor(units)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::IntentKind;

    #[test]
    fn test_request_serializes_camel_case() {
        let intent = Intent::new(
            IntentKind::GroupJoin,
            "grp-7",
            Some(Money::from_minor(350)),
        );
        let request = ApiRequest::from_intent(&intent);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["action"], "group-join");
        assert_eq!(json["correlationId"], intent.correlation_id.to_string());
        assert_eq!(json["payload"]["subjectId"], "grp-7");
        assert_eq!(json["payload"]["amountMinorUnits"], 350);
    }

    #[test]
    fn test_request_is_stable_across_retries() {
        let intent = Intent::new(IntentKind::CartCheckout, "cart-1", None);
        assert_eq!(
            ApiRequest::from_intent(&intent),
            ApiRequest::from_intent(&intent)
        );
    }

    #[test]
    fn test_settled_reply_deserializes() {
        let json = r#"{"status":"ok","details":{"orderId":"ord-9","affectedCount":2}}"#;
        let reply: ApiReply = serde_json::from_str(json).unwrap();
        let ApiReply::Ok { details } = reply else {
            panic!("expected ok reply");
        };
        assert_eq!(details.order_id.as_deref(), Some("ord-9"));
        assert_eq!(details.affected_count, 2);
        assert_eq!(details.funding_required(), None);
    }

    #[test]
    fn test_funding_required_reply_deserializes() {
        let json = r#"{"status":"ok","details":{"amountRequiredMinorUnits":900}}"#;
        let reply: ApiReply = serde_json::from_str(json).unwrap();
        let ApiReply::Ok { details } = reply else {
            panic!("expected ok reply");
        };
        assert_eq!(details.funding_required(), Some(Money::from_minor(900)));
    }

    #[test]
    fn test_zero_required_amount_means_complete() {
        let details = ReplyDetails {
            amount_required_minor_units: Some(0),
            ..Default::default()
        };
        assert_eq!(details.funding_required(), None);
    }

    #[test]
    fn test_error_reply_deserializes() {
        let json = r#"{"status":"error","errors":[{"message":"insufficient inventory"}]}"#;
        let reply: ApiReply = serde_json::from_str(json).unwrap();
        let ApiReply::Error { errors } = reply else {
            panic!("expected error reply");
        };
        assert_eq!(errors[0].message, "insufficient inventory");
    }
}
