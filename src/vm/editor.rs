//! Editor commands.

use serde_json::Value;

use crate::domain::{OpenFile, UiTheme, UiView};
use crate::error::Result;
use crate::protocol::Commands;
use crate::vm::{Vm, field_payload};

/// Editor command group, borrowed from a `Vm`.
pub struct EditorCommands<'a> {
    vm: &'a Vm,
}

impl<'a> EditorCommands<'a> {
    pub(crate) fn new(vm: &'a Vm) -> Self {
        Self { vm }
    }

    /// Open one or more panes of files.
    ///
    /// Paths the project does not have are skipped; the call fails only if
    /// none of the requested paths exist.
    pub async fn open_file(&self, file: impl Into<OpenFile>) -> Result<()> {
        let path = serde_json::to_value(file.into())?;
        self.vm
            .request(Commands::OPEN_FILE, field_payload("path", path))
            .await?;
        Ok(())
    }

    /// Focus an already open file. Fails if the project has no such file.
    pub async fn set_current_file(&self, path: &str) -> Result<()> {
        self.vm
            .request(
                Commands::SET_CURRENT_FILE,
                field_payload("path", Value::String(path.to_string())),
            )
            .await?;
        Ok(())
    }

    pub async fn set_theme(&self, theme: UiTheme) -> Result<()> {
        self.vm
            .request(
                Commands::SET_UI_THEME,
                field_payload("theme", Value::String(theme.as_str().to_string())),
            )
            .await?;
        Ok(())
    }

    pub async fn set_view(&self, view: UiView) -> Result<()> {
        self.vm
            .request(
                Commands::SET_UI_VIEW,
                field_payload("view", Value::String(view.as_str().to_string())),
            )
            .await?;
        Ok(())
    }

    pub async fn show_sidebar(&self, visible: bool) -> Result<()> {
        self.vm
            .request(Commands::TOGGLE_SIDEBAR, field_payload("visible", Value::Bool(visible)))
            .await?;
        Ok(())
    }
}
