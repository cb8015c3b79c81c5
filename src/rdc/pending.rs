//! Pending-call table.
//!
//! Each entry is removed exactly once: by the matching response, by the
//! caller giving up (timeout or dropped future), or by teardown. Whoever
//! removes it owns the sender; everyone else finds nothing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::error::{Result, VmError};
use crate::id::generate_request_id;
use crate::protocol::Payload;

/// What a pending call eventually receives.
pub type Reply = Result<Option<Payload>>;

/// Call awaiting its response.
#[derive(Debug)]
pub struct PendingCall {
    pub command: String,
    pub sender: oneshot::Sender<Reply>,
}

/// In-flight requests keyed by request id.
///
/// The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct PendingTable {
    calls: Mutex<HashMap<String, PendingCall>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> MutexGuard<'_, HashMap<String, PendingCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a call under a fresh id, unique among in-flight calls.
    pub fn register(&self, command: &str) -> (String, oneshot::Receiver<Reply>) {
        let (sender, receiver) = oneshot::channel();
        let mut calls = self.calls();
        let mut id = generate_request_id();
        while calls.contains_key(&id) {
            id = generate_request_id();
        }
        calls.insert(
            id.clone(),
            PendingCall {
                command: command.to_string(),
                sender,
            },
        );
        (id, receiver)
    }

    /// Take the call registered under `id`.
    pub fn remove(&self, id: &str) -> Option<PendingCall> {
        self.calls().remove(id)
    }

    /// Settle every pending call with `ChannelClosed`.
    pub fn fail_all(&self, reason: &str) -> usize {
        let drained: Vec<PendingCall> = self.calls().drain().map(|(_, call)| call).collect();
        let count = drained.len();
        for call in drained {
            let _ = call
                .sender
                .send(Err(VmError::ChannelClosed(format!("{}: {}", call.command, reason))));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.calls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
