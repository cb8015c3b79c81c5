//! Embedded endpoint - serves a `RootDispatcher` over ports
//!
//! Provides:
//! - Init handshake on a control port, answered with a fresh command port
//! - Command dispatch with optional response delay
//! - Failure injection and shutdown through an admin channel

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::channel::{Port, PortSender, Transfer, message_channel};
use crate::error::{Result, VmError};
use crate::protocol::InitRequest;
use crate::remote::dispatcher::{Outbound, RootDispatcher};
use crate::remote::model::DEFAULT_PREVIEW_ORIGIN;

/// Configuration for the simulated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Origin advertised for the live preview
    pub preview_origin: String,
    /// Delay before each command reply is posted
    pub response_delay_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            preview_origin: DEFAULT_PREVIEW_ORIGIN.to_string(),
            response_delay_ms: 0,
        }
    }
}

impl EndpointConfig {
    /// Set the reply delay
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn response_delay(&self) -> Option<Duration> {
        (self.response_delay_ms > 0).then(|| Duration::from_millis(self.response_delay_ms))
    }
}

#[derive(Debug)]
enum AdminCommand {
    FailCommand(String),
    Shutdown,
}

/// Handle to a running endpoint task.
#[derive(Debug)]
pub struct EndpointHandle {
    admin_tx: mpsc::UnboundedSender<AdminCommand>,
    task: JoinHandle<()>,
}

impl EndpointHandle {
    /// Stop answering `command` from now on.
    pub fn fail_command(&self, command: impl Into<String>) -> Result<()> {
        self.admin_tx
            .send(AdminCommand::FailCommand(command.into()))
            .map_err(|_| VmError::ChannelClosed("endpoint stopped".into()))
    }

    /// Stop the endpoint and wait for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.admin_tx.send(AdminCommand::Shutdown);
        if let Err(e) = self.task.await {
            warn!("Endpoint task ended abnormally: {}", e);
        }
    }

    /// Wait until the endpoint stops on its own (all its ports closed).
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Endpoint task ended abnormally: {}", e);
        }
    }
}

/// Simulated embedded VM.
pub struct EmbeddedEndpoint {
    dispatcher: RootDispatcher,
    control: Option<Port<Transfer>>,
    commands: Option<Port>,
    answered_init: Option<String>,
    response_delay: Option<Duration>,
}

impl EmbeddedEndpoint {
    /// Serve `dispatcher` behind a control port. Commands flow over the port
    /// handed out with the init answer.
    pub fn spawn(control: Port<Transfer>, dispatcher: RootDispatcher, config: &EndpointConfig) -> EndpointHandle {
        Self {
            dispatcher,
            control: Some(control),
            commands: None,
            answered_init: None,
            response_delay: config.response_delay(),
        }
        .start()
    }

    /// Serve `dispatcher` on a single port carrying both the handshake and
    /// the commands, e.g. a bridged byte stream.
    pub fn spawn_direct(port: Port, dispatcher: RootDispatcher, config: &EndpointConfig) -> EndpointHandle {
        Self {
            dispatcher,
            control: None,
            commands: Some(port),
            answered_init: None,
            response_delay: config.response_delay(),
        }
        .start()
    }

    fn start(self) -> EndpointHandle {
        let (admin_tx, admin_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(admin_rx));
        EndpointHandle { admin_tx, task }
    }

    async fn run(mut self, mut admin_rx: mpsc::UnboundedReceiver<AdminCommand>) {
        info!("Embedded endpoint started");
        loop {
            if self.control.is_none() && self.commands.is_none() {
                debug!("All endpoint ports closed");
                break;
            }

            tokio::select! {
                biased;

                admin = admin_rx.recv() => match admin {
                    Some(AdminCommand::FailCommand(command)) => self.dispatcher.fail_command(command),
                    Some(AdminCommand::Shutdown) | None => break,
                },
                message = next_message(&mut self.control) => match message {
                    Some(transfer) => self.on_control(transfer.data),
                    None => {
                        debug!("Control port closed");
                        self.control = None;
                    }
                },
                message = next_message(&mut self.commands) => match message {
                    Some(value) => self.on_command(value),
                    None => {
                        debug!("Command port closed");
                        self.commands = None;
                    }
                },
            }
        }
        info!("Embedded endpoint stopped");
    }

    fn on_control(&mut self, data: Value) {
        let Some(init) = InitRequest::parse(&data) else {
            debug!("Ignoring non-init control message");
            return;
        };
        if self.answered_init.as_deref() == Some(init.id.as_str()) {
            debug!("Init {} already answered", init.id);
            return;
        }
        let Some(Outbound::Init(answer)) = self.dispatcher.handle(&data) else {
            return;
        };
        let Some(control) = &self.control else {
            return;
        };

        let value = match answer.to_value() {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode init answer: {}", e);
                return;
            }
        };
        let (host_end, endpoint_end) = message_channel();
        match control.send(Transfer::with_port(value, host_end)) {
            Ok(()) => {
                info!("Handshake {} complete", init.id);
                self.answered_init = Some(init.id);
                self.commands = Some(endpoint_end);
            }
            Err(e) => debug!("Could not answer init: {}", e),
        }
    }

    fn on_command(&mut self, message: Value) {
        let Some(outbound) = self.dispatcher.handle(&message) else {
            return;
        };
        let Some(commands) = &self.commands else {
            return;
        };
        match outbound.into_value() {
            Ok(value) => post(commands.sender(), value, self.response_delay),
            Err(e) => warn!("Failed to encode reply: {}", e),
        }
    }
}

async fn next_message<T>(port: &mut Option<Port<T>>) -> Option<T> {
    match port {
        Some(port) => port.recv().await,
        None => std::future::pending().await,
    }
}

fn post(sender: PortSender, value: Value, delay: Option<Duration>) {
    match delay {
        Some(delay) => {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = sender.send(value) {
                    debug!("Delayed reply dropped: {}", e);
                }
            });
        }
        None => {
            if let Err(e) = sender.send(value) {
                debug!("Reply dropped: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Project, ProjectOptions, ProjectTemplate};
    use crate::protocol::{InitResponse, ResponseEnvelope};
    use serde_json::json;

    fn dispatcher() -> RootDispatcher {
        let project = Project::new("Test", ProjectTemplate::Javascript).with_file("index.js", "1");
        RootDispatcher::new(project, &ProjectOptions::default(), DEFAULT_PREVIEW_ORIGIN)
    }

    async fn handshake(control: &mut Port<Transfer>, id: &str) -> (InitResponse, Port) {
        control.send(Transfer::data(json!({"action": "INIT", "id": id}))).unwrap();
        let reply = control.recv().await.unwrap();
        (InitResponse::parse(&reply.data).unwrap(), reply.port.unwrap())
    }

    #[tokio::test]
    async fn test_handshake_hands_out_command_port() {
        let (mut host, endpoint) = message_channel::<Transfer>();
        let handle = EmbeddedEndpoint::spawn(endpoint, dispatcher(), &EndpointConfig::default());

        let (answer, mut port) = handshake(&mut host, "init-1").await;
        assert_eq!(answer.id, "init-1");
        assert_eq!(answer.payload.preview_origin.as_deref(), Some(DEFAULT_PREVIEW_ORIGIN));

        port.send(json!({"commandName": "SDK_GET_PREVIEW_URL", "payload": {"requestId": "r1"}}))
            .unwrap();
        let reply = ResponseEnvelope::parse(&port.recv().await.unwrap()).unwrap();
        assert_eq!(reply.command_name, "SDK_GET_PREVIEW_URL_SUCCESS");
        assert_eq!(reply.payload["url"], "http://localhost:8080/");

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_duplicate_init_is_ignored() {
        let (mut host, endpoint) = message_channel::<Transfer>();
        let handle = EmbeddedEndpoint::spawn(endpoint, dispatcher(), &EndpointConfig::default());

        let (_, mut port) = handshake(&mut host, "init-1").await;
        host.send(Transfer::data(json!({"action": "INIT", "id": "init-1"}))).unwrap();

        // The first command port keeps working and no second answer arrives
        port.send(json!({"commandName": "SDK_SET_UI_VIEW", "payload": {"view": "editor", "requestId": "r"}}))
            .unwrap();
        assert!(port.recv().await.is_some());
        assert!(host.try_recv().is_none());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_fail_command_drops_reply() {
        let (mut host, endpoint) = message_channel::<Transfer>();
        let handle = EmbeddedEndpoint::spawn(endpoint, dispatcher(), &EndpointConfig::default());
        let (_, mut port) = handshake(&mut host, "init-1").await;

        handle.fail_command("SDK_GET_FS_SNAPSHOT").unwrap();
        port.send(json!({"commandName": "SDK_GET_FS_SNAPSHOT", "payload": {"requestId": "a"}}))
            .unwrap();
        port.send(json!({"commandName": "SDK_GET_PREVIEW_URL", "payload": {"requestId": "b"}}))
            .unwrap();

        let reply = ResponseEnvelope::parse(&port.recv().await.unwrap()).unwrap();
        assert_eq!(reply.request_id(), Some("b"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_response_delay() {
        let (mut host, endpoint) = message_channel::<Transfer>();
        let config = EndpointConfig::default().with_response_delay(Duration::from_millis(50));
        let handle = EmbeddedEndpoint::spawn(endpoint, dispatcher(), &config);
        let (_, mut port) = handshake(&mut host, "init-1").await;

        let start = tokio::time::Instant::now();
        port.send(json!({"commandName": "SDK_GET_PREVIEW_URL", "payload": {"requestId": "r"}}))
            .unwrap();
        port.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_direct_mode_answers_inline() {
        let (mut host, endpoint) = message_channel();
        let handle = EmbeddedEndpoint::spawn_direct(endpoint, dispatcher(), &EndpointConfig::default());

        host.send(json!({"action": "INIT", "id": "stdio"})).unwrap();
        let answer = InitResponse::parse(&host.recv().await.unwrap()).unwrap();
        assert_eq!(answer.id, "stdio");

        drop(host);
        handle.join().await;
    }
}
