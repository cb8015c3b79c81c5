//! Host side of the init handshake.
//!
//! The host keeps posting `INIT` on the control port until the embedded side
//! answers with `INIT_SUCCESS` and a command port, then builds a `Vm` on that
//! port.

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::channel::{Port, Transfer};
use crate::error::{Result, VmError};
use crate::id::generate_init_id;
use crate::protocol::{InitRequest, InitResponse};
use crate::rdc::{Rdc, RdcConfig};
use crate::vm::Vm;

pub const DEFAULT_CONNECT_INTERVAL_MS: u64 = 500;
pub const DEFAULT_CONNECT_MAX_ATTEMPTS: u32 = 20;

const CONNECT_TIMEOUT_MESSAGE: &str = "Timeout: Unable to establish a connection with the embedded project";

/// Handshake retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Time between `INIT` attempts
    pub interval_ms: u64,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_CONNECT_INTERVAL_MS,
            max_attempts: DEFAULT_CONNECT_MAX_ATTEMPTS,
        }
    }
}

impl ConnectConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Perform the init handshake over `control` and return a connected `Vm`.
///
/// Answers with a different id, without a port, or that are not init answers
/// at all are ignored.
pub async fn connect(control: &mut Port<Transfer>, config: &ConnectConfig, rdc_config: RdcConfig) -> Result<Vm> {
    let id = generate_init_id();
    let request = InitRequest::new(id.as_str()).to_value()?;

    for attempt in 1..=config.max_attempts {
        debug!("Sending {} (attempt {}/{})", id, attempt, config.max_attempts);
        control.send(Transfer::data(request.clone()))?;

        let deadline = Instant::now() + config.interval();
        loop {
            let transfer = match tokio::time::timeout_at(deadline, control.recv()).await {
                Ok(Some(transfer)) => transfer,
                Ok(None) => {
                    return Err(VmError::ChannelClosed("control port closed during handshake".into()));
                }
                Err(_) => break,
            };

            let Some(answer) = InitResponse::parse(&transfer.data) else {
                debug!("Ignoring control message during handshake");
                continue;
            };
            if answer.id != id {
                debug!("Ignoring init answer for {}", answer.id);
                continue;
            }
            let Some(port) = transfer.port else {
                warn!("Init answer {} carried no port", answer.id);
                continue;
            };

            info!(
                "Connected to embedded project (previewOrigin: {})",
                answer.payload.preview_origin.as_deref().unwrap_or("none")
            );
            return Ok(Vm::new(Rdc::new(port, rdc_config), answer.payload.preview_origin));
        }
    }

    warn!("Handshake {} unanswered after {} attempts", id, config.max_attempts);
    Err(VmError::Connect(CONNECT_TIMEOUT_MESSAGE.into()))
}
