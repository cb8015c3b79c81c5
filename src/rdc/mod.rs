//! Request/response correlation engine
//!
//! Matches asynchronous replies on a port to the calls that caused them.
//! One engine serves exactly one port and owns its table of pending calls.
//!
//! - config: timeout policy
//! - pending: the pending-call table
//! - engine: `Rdc`, the `request()` entry point and the inbound listener

pub mod config;
pub mod engine;
pub mod pending;

pub use config::RdcConfig;
pub use engine::Rdc;
