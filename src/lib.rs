//! vmlink - drive an embedded project VM over message ports
//!
//! A host talks to an embedded editor/VM by posting command envelopes over a
//! message port. Replies arrive asynchronously and are matched to the call
//! that caused them by a correlation engine, which also bounds how long a
//! call may wait. The crate also carries a simulated embedded VM that answers
//! the same commands against an in-memory project.

pub mod channel;
pub mod connect;
pub mod domain;
pub mod error;
pub mod id;
pub mod protocol;
pub mod rdc;
pub mod remote;
pub mod vm;

pub use channel::{Port, Transfer, message_channel};
pub use connect::{ConnectConfig, connect};
pub use error::{Result, VmError};
pub use rdc::{Rdc, RdcConfig};
pub use remote::{EmbeddedEndpoint, EndpointConfig, EndpointHandle, RootDispatcher};
pub use vm::Vm;
