//! Command façade - typed commands for an embedded VM
//!
//! Groups commands the way the embedded editor exposes them:
//! - filesystem and dependency inspection directly on `Vm`
//! - `vm.editor()`: open files, current file, theme, view, sidebar
//! - `vm.preview()`: preview origin and URL
//!
//! Arguments are validated before anything is sent. Remote rejections and
//! timeouts from the correlation engine come back unchanged.

pub mod editor;
pub mod preview;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{FsDiff, ProjectDependencies, ProjectFiles};
use crate::error::{Result, VmError};
use crate::protocol::{Commands, Payload};
use crate::rdc::Rdc;

pub use editor::EditorCommands;
pub use preview::PreviewCommands;

/// Handle on a connected embedded VM.
pub struct Vm {
    rdc: Rdc,
    preview_origin: Option<String>,
}

impl Vm {
    /// Wrap a correlation engine. `preview_origin` is what the init handshake advertised.
    pub fn new(rdc: Rdc, preview_origin: Option<String>) -> Self {
        Self {
            rdc,
            preview_origin,
        }
    }

    pub fn rdc(&self) -> &Rdc {
        &self.rdc
    }

    pub fn editor(&self) -> EditorCommands<'_> {
        EditorCommands::new(self)
    }

    pub fn preview(&self) -> PreviewCommands<'_> {
        PreviewCommands::new(self)
    }

    /// Snapshot of every file, or `None` if the project has no files.
    pub async fn get_fs_snapshot(&self) -> Result<Option<ProjectFiles>> {
        let result = self.request(Commands::GET_FS_SNAPSHOT, Payload::new()).await?;
        result.map(decode).transpose()
    }

    /// Create/overwrite then delete files.
    pub async fn apply_fs_diff(&self, diff: &FsDiff) -> Result<()> {
        self.request(Commands::APPLY_FS_DIFF, to_payload(diff)?).await?;
        Ok(())
    }

    /// Validate an untyped diff, then apply it.
    ///
    /// A malformed diff fails here without reaching the channel.
    pub async fn apply_fs_diff_value(&self, diff: &Value) -> Result<()> {
        let diff = FsDiff::from_value(diff)?;
        self.apply_fs_diff(&diff).await
    }

    /// Installed dependencies with their resolved versions, or `None` if there are none.
    pub async fn get_dependencies(&self) -> Result<Option<ProjectDependencies>> {
        let result = self.request(Commands::GET_DEPS_SNAPSHOT, Payload::new()).await?;
        result.map(decode).transpose()
    }

    /// Tear down the underlying engine; pending calls fail with `ChannelClosed`.
    pub fn close(&self) {
        self.rdc.close();
    }

    pub(crate) async fn request(&self, command: &str, payload: Payload) -> Result<Option<Payload>> {
        self.rdc.request(command, payload).await
    }
}

/// Single-field payload.
pub(crate) fn field_payload(key: &str, value: Value) -> Payload {
    let mut payload = Payload::new();
    payload.insert(key.to_string(), value);
    payload
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<Payload> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(VmError::Protocol(format!("expected an object payload, got {}", other))),
    }
}

fn decode<T: DeserializeOwned>(result: Payload) -> Result<T> {
    serde_json::from_value(Value::Object(result))
        .map_err(|e| VmError::Protocol(format!("unexpected result shape: {}", e)))
}
