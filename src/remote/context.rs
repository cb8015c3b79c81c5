//! Handler context.
//!
//! A handler sees the request it is answering and, through this context, the
//! VM state: read the project or app state, patch either, and build the
//! success or failure reply addressed to the request.

use crate::domain::Project;
use crate::protocol::{Payload, ResponseEnvelope};
use crate::remote::model::{AppState, RemoteState};

pub struct HandlerContext<'a> {
    command: &'a str,
    request_id: &'a str,
    state: &'a mut RemoteState,
}

impl<'a> HandlerContext<'a> {
    pub fn new(command: &'a str, request_id: &'a str, state: &'a mut RemoteState) -> Self {
        Self {
            command,
            request_id,
            state,
        }
    }

    pub fn project(&self) -> &Project {
        self.state.project()
    }

    pub fn patch_project(&mut self, patch: impl FnOnce(&mut Project)) {
        self.state.patch_project(patch);
    }

    pub fn state(&self) -> &AppState {
        self.state.app()
    }

    pub fn patch_state(&mut self, patch: impl FnOnce(&mut AppState)) {
        self.state.patch_app(patch);
    }

    /// `<command>_SUCCESS` carrying `result`.
    pub fn success(&self, result: Payload) -> ResponseEnvelope {
        ResponseEnvelope::success(self.command, self.request_id, result)
    }

    /// `<command>_SUCCESS` with no result fields.
    pub fn success_empty(&self) -> ResponseEnvelope {
        self.success(Payload::new())
    }

    /// `<command>_FAILURE` carrying `message`.
    pub fn error(&self, message: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::failure(self.command, self.request_id, message)
    }
}
