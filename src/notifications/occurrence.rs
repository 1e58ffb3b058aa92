//! Event occurrences
//!
//! An occurrence is an immutable snapshot created when a domain operation
//! starts or completes. Every subscribed sink receives an equivalent,
//! independently readable view; nothing mutates an occurrence after
//! creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known event names. String-keyed and case-sensitive; routing is
/// purely by name.
pub mod event_names {
    pub const AUTH_EVSE_START: &str = "AuthEVSEStart";
    pub const AUTH_EVSE_STARTED: &str = "AuthEVSEStarted";
    pub const AUTH_EVSE_STOP: &str = "AuthEVSEStop";
    pub const AUTH_EVSE_STOPPED: &str = "AuthEVSEStopped";
    pub const REMOTE_EVSE_START: &str = "RemoteEVSEStart";
    pub const REMOTE_EVSE_STARTED: &str = "RemoteEVSEStarted";
    pub const REMOTE_EVSE_STOP: &str = "RemoteEVSEStop";
    pub const REMOTE_EVSE_STOPPED: &str = "RemoteEVSEStopped";
    pub const SEND_CDR: &str = "SendCDR";
    pub const CDR_SENT: &str = "CDRSent";
    pub const GET_EVSES_STATUS_REQUEST: &str = "GetEVSEsStatusRequest";

    /// Every name the hub registers at startup.
    pub const ALL: &[&str] = &[
        AUTH_EVSE_START,
        AUTH_EVSE_STARTED,
        AUTH_EVSE_STOP,
        AUTH_EVSE_STOPPED,
        REMOTE_EVSE_START,
        REMOTE_EVSE_STARTED,
        REMOTE_EVSE_STOP,
        REMOTE_EVSE_STOPPED,
        SEND_CDR,
        CDR_SENT,
        GET_EVSES_STATUS_REQUEST,
    ];
}

/// Payload shapes sinks must render generically: a request, a
/// request/response pair, or an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum EventPayload {
    Request(serde_json::Value),
    RequestResponse {
        request: serde_json::Value,
        response: serde_json::Value,
    },
    ErrorResponse(serde_json::Value),
}

/// Immutable event snapshot passed to every subscribed sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOccurrence {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl EventOccurrence {
    fn new(name: &str, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn request(name: &str, request: serde_json::Value) -> Self {
        Self::new(name, EventPayload::Request(request))
    }

    pub fn request_response(
        name: &str,
        request: serde_json::Value,
        response: serde_json::Value,
    ) -> Self {
        Self::new(name, EventPayload::RequestResponse { request, response })
    }

    pub fn error_response(name: &str, error: serde_json::Value) -> Self {
        Self::new(name, EventPayload::ErrorResponse(error))
    }

    /// Generic textual rendering; sinks may not assume any domain payload
    /// type beyond this and the timestamp.
    pub fn text(&self) -> String {
        let body = match &self.payload {
            EventPayload::Request(request) => request.to_string(),
            EventPayload::RequestResponse { request, response } => {
                format!("{} -> {}", request, response)
            }
            EventPayload::ErrorResponse(error) => format!("error: {}", error),
        };
        format!("[{}] {} {}", self.timestamp.to_rfc3339(), self.name, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering_contains_name_and_payload() {
        let occ = EventOccurrence::request(
            event_names::REMOTE_EVSE_START,
            serde_json::json!({"evse": "DE*GEF*E1*A"}),
        );
        let text = occ.text();
        assert!(text.contains("RemoteEVSEStart"));
        assert!(text.contains("DE*GEF*E1*A"));
    }

    #[test]
    fn occurrences_serialize_to_json() {
        let occ = EventOccurrence::request_response(
            event_names::SEND_CDR,
            serde_json::json!({"session": "s1"}),
            serde_json::json!({"accepted": true}),
        );
        let json = serde_json::to_string(&occ).expect("serializes");
        assert!(json.contains("\"SendCDR\""));
        assert!(json.contains("RequestResponse"));
    }
}
