//! Preview commands.

use serde_json::Value;

use crate::error::{Result, VmError};
use crate::protocol::{Commands, Payload};
use crate::vm::{Vm, field_payload};

/// Preview command group, borrowed from a `Vm`.
pub struct PreviewCommands<'a> {
    vm: &'a Vm,
}

impl<'a> PreviewCommands<'a> {
    pub(crate) fn new(vm: &'a Vm) -> Self {
        Self { vm }
    }

    /// Origin of the preview as advertised during the handshake.
    ///
    /// `None` for projects without a static preview, e.g. node projects
    /// before their server starts.
    pub fn origin(&self) -> Option<&'a str> {
        self.vm.preview_origin.as_deref()
    }

    /// Current preview URL. Fails if no preview is running.
    pub async fn get_url(&self) -> Result<String> {
        let result = self
            .vm
            .request(Commands::GET_PREVIEW_URL, Payload::new())
            .await?;
        result
            .as_ref()
            .and_then(|r| r.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| VmError::Protocol("preview URL missing from response".into()))
    }

    /// Navigate the preview to `path`, which must start with `/`.
    pub async fn set_url(&self, path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(VmError::Validation(format!(
                "Invalid argument: expected a path starting with '/', got '{}'",
                path
            )));
        }
        self.vm
            .request(
                Commands::SET_PREVIEW_URL,
                field_payload("path", Value::String(path.to_string())),
            )
            .await?;
        Ok(())
    }
}
