//! Root dispatcher for the simulated VM.
//!
//! Classifies every inbound message as an init handshake, a command, or
//! noise. Commands are routed to the handler registry; noise is dropped.

use std::collections::HashSet;

use log::{debug, warn};
use serde_json::Value;

use crate::domain::{Project, ProjectOptions};
use crate::error::Result;
use crate::protocol::{InitRequest, InitResponse, RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::model::RemoteState;
use crate::remote::registry::HandlerRegistry;

/// Reply produced for one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Answer to an init handshake; goes back over the control channel.
    Init(InitResponse),
    /// Answer to a command; goes back over the command channel.
    Response(ResponseEnvelope),
}

impl Outbound {
    pub fn into_value(self) -> Result<Value> {
        match self {
            Outbound::Init(init) => init.to_value(),
            Outbound::Response(response) => response.to_value(),
        }
    }
}

pub struct RootDispatcher {
    registry: HandlerRegistry,
    state: RemoteState,
    preview_origin: Option<String>,
    failing: HashSet<String>,
}

impl RootDispatcher {
    /// Dispatcher with the built-in handlers, serving `project`.
    ///
    /// `preview_origin` is advertised during the handshake, except for node
    /// projects which have no static preview.
    pub fn new(project: Project, options: &ProjectOptions, preview_origin: &str) -> Self {
        let advertised = (!project.template.is_node()).then(|| preview_origin.to_string());
        Self {
            registry: HandlerRegistry::with_default_handlers(),
            state: RemoteState::new(project, options, preview_origin),
            preview_origin: advertised,
            failing: HashSet::new(),
        }
    }

    /// Replace the handler registry.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &RemoteState {
        &self.state
    }

    pub fn preview_origin(&self) -> Option<&str> {
        self.preview_origin.as_deref()
    }

    /// Stop answering `command`. The host will see its calls time out.
    pub fn fail_command(&mut self, command: impl Into<String>) {
        let command = command.into();
        warn!("Failure injection enabled for {}", command);
        self.failing.insert(command);
    }

    /// Handle one inbound message. `None` means nothing is sent back.
    pub fn handle(&mut self, message: &Value) -> Option<Outbound> {
        if let Some(init) = InitRequest::parse(message) {
            debug!("Init handshake {}", init.id);
            return Some(Outbound::Init(InitResponse::new(init.id, self.preview_origin.clone())));
        }

        let Some(request) = RequestEnvelope::parse(message) else {
            debug!("Ignoring unrecognized message: {}", message);
            return None;
        };
        // parse() guarantees a string requestId
        let request_id = request.request_id().unwrap_or_default().to_string();
        let command = request.command_name.as_str();

        if self.failing.contains(command) {
            warn!("Dropping {} ({}): failure injected", command, request_id);
            return None;
        }

        let response = match self.registry.get(command) {
            Some(handler) => {
                let mut ctx = HandlerContext::new(command, &request_id, &mut self.state);
                handler.handle(&request, &mut ctx)
            }
            None => {
                debug!("No handler for {}", command);
                ResponseEnvelope::failure(command, &request_id, "NOT IMPLEMENTED")
            }
        };
        Some(Outbound::Response(response))
    }
}
