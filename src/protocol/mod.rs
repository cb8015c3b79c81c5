//! Wire protocol spoken between the host and the embedded VM
//!
//! This module provides:
//! - Request/response envelopes and their metadata fields
//! - Command names understood by the embedded VM
//! - The one-shot init handshake messages

pub mod commands;
pub mod envelope;
pub mod init;

pub use commands::Commands;
pub use envelope::{ERROR_MESSAGE, Payload, REQUEST_ID, RequestEnvelope, ResponseEnvelope, SUCCEEDED};
pub use init::{INIT_ACTION, INIT_SUCCESS_ACTION, InitPayload, InitRequest, InitResponse};
