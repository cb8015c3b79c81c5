//! Simulated embedded VM - the protocol's other half
//!
//! This module provides:
//! - model: project and editor state held by the VM
//! - context: what a handler may read, patch and reply with
//! - registry: command name to handler mapping
//! - handlers: the built-in commands (fs, editor, preview, dependencies)
//! - dispatcher: init handshake vs. command vs. noise routing
//! - endpoint: task serving a dispatcher over ports

pub mod context;
pub mod dispatcher;
pub mod endpoint;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod validation;

pub use context::HandlerContext;
pub use dispatcher::{Outbound, RootDispatcher};
pub use endpoint::{EmbeddedEndpoint, EndpointConfig, EndpointHandle};
pub use model::{AppState, DEFAULT_PREVIEW_ORIGIN, RemoteState};
pub use registry::{CommandHandler, HandlerRegistry};
