//! Typed message envelope for the isolation boundary.
//!
//! The isolated browsing context can affect the host through exactly one
//! channel: a `postMessage` payload shaped as `{ "type": "OPEN_LEAD_FORM",
//! "header": … }`. Everything else arriving on that channel is ignored.

use serde::{Deserialize, Serialize};

/// A message crossing the browsing-context boundary, parent-bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    /// Request to open the lead-capture flow with an optional form header.
    #[serde(rename = "OPEN_LEAD_FORM")]
    OpenLeadForm {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<String>,
    },
}

/// Parse a raw message payload. Malformed JSON and unexpected message
/// shapes yield `None`; the listener must never crash on adversarial input.
pub fn parse_message(raw: &str) -> Option<BridgeMessage> {
    match serde_json::from_str::<BridgeMessage>(raw) {
        Ok(message) => Some(message),
        Err(err) => {
            log::debug!("ignoring bridge message: {}", err);
            None
        }
    }
}
