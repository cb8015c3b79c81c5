//! In-process message ports.
//!
//! A port pair behaves like a browser `MessageChannel`: whatever one end
//! sends, the other end receives, in order. There is no correlation, no
//! acknowledgement and no timeout at this layer.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Result, VmError};

/// Sending half of a port. Cheap to clone.
#[derive(Debug)]
pub struct PortSender<T = Value> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for PortSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> PortSender<T> {
    /// Post a message to the other end.
    pub fn send(&self, message: T) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| VmError::ChannelClosed("peer port dropped".into()))
    }

    /// Whether the other end has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of a port.
#[derive(Debug)]
pub struct PortReceiver<T = Value> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> PortReceiver<T> {
    /// Wait for the next message. `None` once every sender on the other end is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take a message if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

/// One end of a bidirectional message channel.
#[derive(Debug)]
pub struct Port<T = Value> {
    sender: PortSender<T>,
    receiver: PortReceiver<T>,
}

impl<T> Port<T> {
    /// Post a message to the other end.
    pub fn send(&self, message: T) -> Result<()> {
        self.sender.send(message)
    }

    /// Wait for the next message from the other end.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Take a message if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv()
    }

    /// Another handle for posting to the other end.
    pub fn sender(&self) -> PortSender<T> {
        self.sender.clone()
    }

    /// Split into independently owned halves.
    pub fn into_split(self) -> (PortSender<T>, PortReceiver<T>) {
        (self.sender, self.receiver)
    }
}

/// Create an entangled pair of ports.
pub fn message_channel<T>() -> (Port<T>, Port<T>) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    (
        Port {
            sender: PortSender { tx: b_tx },
            receiver: PortReceiver { rx: a_rx },
        },
        Port {
            sender: PortSender { tx: a_tx },
            receiver: PortReceiver { rx: b_rx },
        },
    )
}

/// Message on a control channel: JSON data plus an optional transferred port.
///
/// The port is a capability handed to the receiver, not part of the data.
#[derive(Debug)]
pub struct Transfer {
    pub data: Value,
    pub port: Option<Port>,
}

impl Transfer {
    /// Data-only message.
    pub fn data(data: Value) -> Self {
        Self { data, port: None }
    }

    /// Data with a port handed over alongside.
    pub fn with_port(data: Value, port: Port) -> Self {
        Self {
            data,
            port: Some(port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_message_channel_delivers_both_ways() {
        let (mut a, mut b) = message_channel();
        a.send(json!({"from": "a"})).unwrap();
        b.send(json!({"from": "b"})).unwrap();

        assert_eq!(b.recv().await.unwrap(), json!({"from": "a"}));
        assert_eq!(a.recv().await.unwrap(), json!({"from": "b"}));
    }

    #[tokio::test]
    async fn test_message_channel_is_fifo() {
        let (a, mut b) = message_channel();
        for i in 0..10 {
            a.send(json!(i)).unwrap();
        }
        for i in 0..10 {
            assert_eq!(b.recv().await.unwrap(), json!(i));
        }
    }

    #[tokio::test]
    async fn test_send_to_dropped_peer_fails() {
        let (a, b) = message_channel::<Value>();
        drop(b);
        let err = a.send(json!(1)).unwrap_err();
        assert!(matches!(err, VmError::ChannelClosed(_)));
        assert!(a.sender().is_closed());
    }

    #[tokio::test]
    async fn test_recv_ends_when_peer_dropped() {
        let (mut a, b) = message_channel::<Value>();
        drop(b);
        assert!(a.recv().await.is_none());
    }

    #[test]
    fn test_try_recv_empty() {
        let (mut a, _b) = message_channel::<Value>();
        assert!(a.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_transfer_carries_port() {
        let (control_a, mut control_b) = message_channel::<Transfer>();
        let (mut kept, handed) = message_channel::<Value>();

        control_a
            .send(Transfer::with_port(json!({"action": "hello"}), handed))
            .unwrap();

        let transfer = control_b.recv().await.unwrap();
        assert_eq!(transfer.data["action"], "hello");
        let port = transfer.port.unwrap();
        port.send(json!("through the handed port")).unwrap();
        assert_eq!(kept.recv().await.unwrap(), json!("through the handed port"));
    }
}
