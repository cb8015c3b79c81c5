//! Init handshake messages.
//!
//! The host sends `{ action: "INIT", id }` on the control channel until the
//! embedded side answers `{ action: "INIT_SUCCESS", id, payload }` together
//! with the port commands will flow over.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub const INIT_ACTION: &str = "INIT";
pub const INIT_SUCCESS_ACTION: &str = "INIT_SUCCESS";

/// Handshake request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitRequest {
    pub action: String,
    pub id: String,
}

impl InitRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            action: INIT_ACTION.to_string(),
            id: id.into(),
        }
    }

    /// Recognize an init request: `action == "INIT"` and a string `id`.
    pub fn parse(value: &Value) -> Option<Self> {
        let request: Self = serde_json::from_value(value.clone()).ok()?;
        (request.action == INIT_ACTION).then_some(request)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}

/// Capabilities advertised by the embedded side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    /// Origin of the live preview; `null` when the project has none.
    pub preview_origin: Option<String>,
}

/// Handshake answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    pub action: String,
    pub id: String,
    pub payload: InitPayload,
}

impl InitResponse {
    pub fn new(id: impl Into<String>, preview_origin: Option<String>) -> Self {
        Self {
            action: INIT_SUCCESS_ACTION.to_string(),
            id: id.into(),
            payload: InitPayload { preview_origin },
        }
    }

    pub fn parse(value: &Value) -> Option<Self> {
        let response: Self = serde_json::from_value(value.clone()).ok()?;
        (response.action == INIT_SUCCESS_ACTION).then_some(response)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}
