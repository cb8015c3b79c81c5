//! Request and response envelopes.
//!
//! Both directions share one shape, `{ commandName, payload }`. Correlation
//! metadata lives inside the payload next to the command's own fields:
//! - request: `requestId`
//! - response: `requestId`, `succeeded`, optional `errorMessage`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VmError};
use crate::protocol::commands::{failure_name, success_name};

/// Command payload: a JSON object.
pub type Payload = Map<String, Value>;

/// Payload key carrying the correlation id.
pub const REQUEST_ID: &str = "requestId";
/// Payload key carrying the success flag of a response.
pub const SUCCEEDED: &str = "succeeded";
/// Payload key carrying the failure message of a response.
pub const ERROR_MESSAGE: &str = "errorMessage";

/// Message sent from the host to the embedded VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub command_name: String,
    #[serde(default)]
    pub payload: Payload,
}

impl RequestEnvelope {
    /// Create a request with the given command and payload.
    pub fn new(command_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            command_name: command_name.into(),
            payload,
        }
    }

    /// Merge the correlation id into the payload.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.payload.insert(REQUEST_ID.into(), Value::String(id.into()));
        self
    }

    /// Correlation id, if present and a string.
    pub fn request_id(&self) -> Option<&str> {
        self.payload.get(REQUEST_ID).and_then(Value::as_str)
    }

    /// Payload field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Parse an inbound message as a request. `None` unless it has a
    /// non-empty `commandName` and a string `requestId`.
    pub fn parse(value: &Value) -> Option<Self> {
        let request: Self = serde_json::from_value(value.clone()).ok()?;
        if request.command_name.is_empty() || request.request_id().is_none() {
            return None;
        }
        Some(request)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}

/// Message sent from the embedded VM back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub command_name: String,
    #[serde(default)]
    pub payload: Payload,
}

impl ResponseEnvelope {
    /// Success reply for `command`, named `<command>_SUCCESS`.
    ///
    /// Result fields are written first so they can never shadow the metadata.
    pub fn success(command: &str, request_id: &str, result: Payload) -> Self {
        let mut payload = result;
        payload.insert(REQUEST_ID.into(), Value::String(request_id.into()));
        payload.insert(SUCCEEDED.into(), Value::Bool(true));
        Self {
            command_name: success_name(command),
            payload,
        }
    }

    /// Failure reply for `command`, named `<command>_FAILURE`.
    pub fn failure(command: &str, request_id: &str, message: impl Into<String>) -> Self {
        let mut payload = Payload::new();
        payload.insert(REQUEST_ID.into(), Value::String(request_id.into()));
        payload.insert(SUCCEEDED.into(), Value::Bool(false));
        payload.insert(ERROR_MESSAGE.into(), Value::String(message.into()));
        Self {
            command_name: failure_name(command),
            payload,
        }
    }

    /// Parse an inbound message as a response.
    ///
    /// Returns `None` for anything without a string `requestId`: such messages
    /// are not part of this protocol.
    pub fn parse(value: &Value) -> Option<Self> {
        let response: Self = serde_json::from_value(value.clone()).ok()?;
        response.request_id()?;
        Some(response)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.payload.get(REQUEST_ID).and_then(Value::as_str)
    }

    /// A missing or non-boolean flag counts as failure.
    pub fn succeeded(&self) -> bool {
        self.payload
            .get(SUCCEEDED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Failure message; an empty string counts as absent.
    pub fn error_message(&self) -> Option<&str> {
        self.payload
            .get(ERROR_MESSAGE)
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
    }

    /// Resolve this response into what the original caller receives.
    ///
    /// Success yields the payload without metadata, or `None` when nothing
    /// else is left. Failure yields `"<commandName>: <errorMessage>"`, or just
    /// `<commandName>` without a message.
    pub fn into_outcome(self) -> Result<Option<Payload>> {
        if !self.succeeded() {
            let message = match self.error_message() {
                Some(msg) => format!("{}: {}", self.command_name, msg),
                None => self.command_name.clone(),
            };
            return Err(VmError::Rejected(message));
        }

        let mut result = self.payload;
        result.remove(REQUEST_ID);
        result.remove(SUCCEEDED);
        result.remove(ERROR_MESSAGE);
        Ok(if result.is_empty() { None } else { Some(result) })
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}
