use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::AutofillError;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/fill";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of the one message kind the bridge understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchPayload {
    #[serde(rename = "domContent")]
    pub dom_content: String,
}

/// `{"type": "fetchData", "payload": {"domContent": "..."}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BridgeMessage {
    #[serde(rename = "fetchData")]
    FetchData(FetchPayload),
}

impl BridgeMessage {
    pub fn fetch_data(dom_content: String) -> Self {
        BridgeMessage::FetchData(FetchPayload { dom_content })
    }
}

/// JSON reply of the inference service; values live under `data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelayReply {
    #[serde(default)]
    pub data: Value,
}

/// Anything that can carry a bridge message and hand back a single reply.
pub trait MessageBridge {
    fn send(&self, message: BridgeMessage) -> Result<RelayReply, AutofillError>;
}

/// Forwards page markup to the local inference endpoint over HTTP.
///
/// Every request is bounded by a connect timeout and an overall timeout.
/// Failures are logged here and returned to the caller; nothing is retried.
pub struct Relay {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl Relay {
    pub fn new(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, AutofillError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|source| AutofillError::Relay {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Ok(Relay {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn with_defaults() -> Result<Self, AutofillError> {
        Relay::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{ "domContent": ... }` and decode the JSON reply.
    pub fn forward(&self, payload: &FetchPayload) -> Result<RelayReply, AutofillError> {
        debug!(endpoint = %self.endpoint, bytes = payload.dom_content.len(), "relaying page markup");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .map_err(|source| {
                error!(endpoint = %self.endpoint, error = %source, "relay request failed");
                AutofillError::Relay {
                    endpoint: self.endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(endpoint = %self.endpoint, status = status.as_u16(), "relay endpoint rejected request");
            return Err(AutofillError::RelayStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<RelayReply>().map_err(|source| {
            error!(endpoint = %self.endpoint, error = %source, "relay reply was not valid JSON");
            AutofillError::Relay {
                endpoint: self.endpoint.clone(),
                source,
            }
        })
    }
}

impl MessageBridge for Relay {
    fn send(&self, message: BridgeMessage) -> Result<RelayReply, AutofillError> {
        match message {
            BridgeMessage::FetchData(payload) => self.forward(&payload),
        }
    }
}

/// Bridge that answers every message with a canned reply (for testing
/// without an inference service).
pub struct MockBridge {
    pub reply: RelayReply,
}

impl MockBridge {
    pub fn with_data(data: Value) -> Self {
        MockBridge {
            reply: RelayReply { data },
        }
    }
}

impl MessageBridge for MockBridge {
    fn send(&self, _message: BridgeMessage) -> Result<RelayReply, AutofillError> {
        Ok(self.reply.clone())
    }
}
