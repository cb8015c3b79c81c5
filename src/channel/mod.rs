//! Channel layer - message ports connecting the host and the embedded VM
//!
//! This module provides:
//! - `Port`: one end of an entangled, bidirectional, FIFO message channel
//! - `Transfer`: a control message carrying JSON data plus an optional port
//! - `stream`: newline-delimited JSON bridge between a port and a byte stream

pub mod port;
pub mod stream;

pub use port::{Port, PortReceiver, PortSender, Transfer, message_channel};
pub use stream::{bridge_stream, bridge_stream_with_max_length};
