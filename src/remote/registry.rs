//! Command handler registry.
//!
//! New commands are added by registering a handler under their name; nothing
//! else needs to change.

use std::collections::HashMap;

use crate::protocol::{RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::handlers;

/// Answers one command.
pub trait CommandHandler: Send + Sync {
    /// Validate `request` against the VM state, patch the state if valid, and
    /// return the reply.
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope;
}

/// Handler backed by a closure.
pub struct FnHandler<F> {
    callback: F,
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&RequestEnvelope, &mut HandlerContext<'_>) -> ResponseEnvelope + Send + Sync,
{
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        (self.callback)(request, ctx)
    }
}

/// Command name → handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command.
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        handlers::register_defaults(&mut registry);
        registry
    }

    /// Register `handler` under `command`, replacing any previous one.
    pub fn register(&mut self, command: impl Into<String>, handler: impl CommandHandler + 'static) {
        self.handlers.insert(command.into(), Box::new(handler));
    }

    /// Register a closure as the handler for `command`.
    pub fn register_fn<F>(&mut self, command: impl Into<String>, callback: F)
    where
        F: Fn(&RequestEnvelope, &mut HandlerContext<'_>) -> ResponseEnvelope + Send + Sync + 'static,
    {
        self.register(command, FnHandler { callback });
    }

    pub fn get(&self, command: &str) -> Option<&dyn CommandHandler> {
        self.handlers.get(command).map(Box::as_ref)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
