//! The correlation engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::channel::{Port, PortReceiver, PortSender};
use crate::error::{Result, VmError};
use crate::protocol::{Payload, RequestEnvelope, ResponseEnvelope};
use crate::rdc::config::RdcConfig;
use crate::rdc::pending::PendingTable;

/// Removes a pending call when the waiting `request()` finishes or is dropped.
struct PendingGuard<'a> {
    table: &'a PendingTable,
    id: String,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.table.remove(&self.id);
    }
}

/// Correlates requests sent on a port with the responses coming back on it.
///
/// Owns the port: outbound requests go through its sender, and a listener
/// task drains its receiver. Responses may arrive in any order.
pub struct Rdc {
    config: RdcConfig,
    outbound: PortSender,
    pending: Arc<PendingTable>,
    closed: Arc<AtomicBool>,
    listener: JoinHandle<()>,
}

impl Rdc {
    /// Take ownership of `port` and start listening. Must be called inside a tokio runtime.
    pub fn new(port: Port, config: RdcConfig) -> Self {
        let (outbound, inbound) = port.into_split();
        let pending = Arc::new(PendingTable::new());
        let closed = Arc::new(AtomicBool::new(false));
        let listener = tokio::spawn(listen(inbound, Arc::clone(&pending), Arc::clone(&closed)));

        Self {
            config,
            outbound,
            pending,
            closed,
            listener,
        }
    }

    pub fn config(&self) -> &RdcConfig {
        &self.config
    }

    /// Number of calls still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Send `command_name` with `payload` and wait for the matching response.
    ///
    /// Resolves to the response payload without its metadata, or `None` if
    /// nothing else was in it. Fails with `Rejected` when the remote declined,
    /// `Timeout` when it never answered within the bound, and `ChannelClosed`
    /// when the engine or channel went away first.
    pub async fn request(&self, command_name: &str, payload: Payload) -> Result<Option<Payload>> {
        if command_name.is_empty() {
            return Err(VmError::Validation("Command name must not be empty".into()));
        }

        let (id, receiver) = self.pending.register(command_name);
        let _guard = PendingGuard {
            table: &self.pending,
            id: id.clone(),
        };

        if self.is_closed() {
            return Err(VmError::ChannelClosed(format!("{}: engine closed", command_name)));
        }

        let message = RequestEnvelope::new(command_name, payload)
            .with_request_id(id.as_str())
            .to_value()?;
        self.outbound.send(message)?;
        debug!("Sent {} ({})", command_name, id);

        let received = match self.config.request_timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, receiver).await {
                Ok(received) => received,
                Err(_) => {
                    let timeout_ms = timeout.as_millis() as u64;
                    warn!("{} ({}) timed out after {}ms", command_name, id, timeout_ms);
                    return Err(VmError::Timeout {
                        command: command_name.to_string(),
                        timeout_ms,
                    });
                }
            },
            None => receiver.await,
        };

        received.unwrap_or_else(|_| {
            Err(VmError::ChannelClosed(format!("{}: pending call dropped", command_name)))
        })
    }

    /// Stop listening and fail every pending call with `ChannelClosed`.
    ///
    /// Later `request()` calls fail immediately.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.listener.abort();
        let failed = self.pending.fail_all("engine closed");
        debug!("Engine closed, failed {} pending call(s)", failed);
    }
}

impl Drop for Rdc {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Route inbound responses to their pending calls until the port closes.
async fn listen(mut inbound: PortReceiver, pending: Arc<PendingTable>, closed: Arc<AtomicBool>) {
    while let Some(message) = inbound.recv().await {
        let Some(response) = ResponseEnvelope::parse(&message) else {
            debug!("Ignoring message without a requestId");
            continue;
        };
        let Some(id) = response.request_id().map(str::to_string) else {
            continue;
        };
        match pending.remove(&id) {
            Some(call) => {
                debug!("Settling {} ({})", call.command, id);
                let _ = call.sender.send(response.into_outcome());
            }
            None => debug!("No pending call for {}, dropping response", id),
        }
    }

    closed.store(true, Ordering::SeqCst);
    let failed = pending.fail_all("channel closed");
    if failed > 0 {
        warn!("Inbound channel ended with {} pending call(s)", failed);
    }
}
