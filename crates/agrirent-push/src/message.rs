//! Relay message and ticket wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Relay error code for a token the device no longer answers to.
pub const DEVICE_NOT_REGISTERED: &str = "DeviceNotRegistered";

/// One push message as sent to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Recipient push token.
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    /// Flattened notification payload.
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    /// A message with the default sound.
    pub fn new(
        to: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        data: BTreeMap<String, String>,
    ) -> Self {
        Self {
            to: to.into(),
            sound: "default".to_string(),
            title: title.into(),
            body: body.into(),
            data,
        }
    }
}

/// Extra detail on a failed ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Machine-readable error code, e.g. `DeviceNotRegistered`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-message acknowledgement returned by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    /// Accepted for delivery.
    Ok {
        #[serde(default)]
        id: Option<String>,
    },
    /// Rejected for this recipient.
    Error {
        #[serde(default)]
        message: String,
        #[serde(default)]
        details: Option<TicketDetails>,
    },
}

impl PushTicket {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The relay's error code, if this is an error ticket that carries one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error {
                details: Some(details),
                ..
            } => details.error.as_deref(),
            _ => None,
        }
    }

    /// Whether the relay reported the token as no longer registered.
    pub fn is_device_not_registered(&self) -> bool {
        self.error_code() == Some(DEVICE_NOT_REGISTERED)
    }
}

/// Body of a successful relay response.
#[derive(Debug, Deserialize)]
pub(crate) struct SendResponse {
    pub data: Vec<PushTicket>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_shape() {
        let msg = PushMessage::new(
            "ExponentPushToken[abc]",
            "Booking Status Update",
            "Your booking for Tractor has been confirmed.",
            BTreeMap::from([("type".to_string(), "booking_confirmed".to_string())]),
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["sound"], "default");
        assert_eq!(value["to"], "ExponentPushToken[abc]");
        assert_eq!(value["data"]["type"], "booking_confirmed");
    }

    #[test]
    fn test_ticket_parsing() {
        let response: SendResponse = serde_json::from_value(json!({
            "data": [
                {"status": "ok", "id": "t-1"},
                {"status": "error", "message": "not registered",
                 "details": {"error": "DeviceNotRegistered"}},
                {"status": "error", "message": "too big"}
            ]
        }))
        .unwrap();
        assert!(response.data[0].is_ok());
        assert!(response.data[1].is_device_not_registered());
        assert_eq!(response.data[2].error_code(), None);
        assert!(!response.data[2].is_ok());
    }
}
