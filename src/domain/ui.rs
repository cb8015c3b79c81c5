//! Editor UI values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VmError;

/// Editor color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiTheme {
    #[default]
    Default,
    Light,
    Dark,
}

impl UiTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiTheme::Default => "default",
            UiTheme::Light => "light",
            UiTheme::Dark => "dark",
        }
    }

    /// Interpret a raw payload value. `None` for anything outside the enumeration.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl fmt::Display for UiTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UiTheme {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(UiTheme::Default),
            "light" => Ok(UiTheme::Light),
            "dark" => Ok(UiTheme::Dark),
            other => Err(VmError::Validation(format!(
                "Invalid theme '{}': expected one of default, light, dark",
                other
            ))),
        }
    }
}

/// Editor layout: both panels, editor only, or preview only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiView {
    #[default]
    Default,
    Editor,
    Preview,
}

impl UiView {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiView::Default => "default",
            UiView::Editor => "editor",
            UiView::Preview => "preview",
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl fmt::Display for UiView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UiView {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(UiView::Default),
            "editor" => Ok(UiView::Editor),
            "preview" => Ok(UiView::Preview),
            other => Err(VmError::Validation(format!(
                "Invalid view '{}': expected one of default, editor, preview",
                other
            ))),
        }
    }
}

/// File(s) to open in the editor.
///
/// Each entry is one pane; a pane holding several files joins their paths
/// with commas, e.g. `"index.js,README.md"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenFile {
    Single(String),
    Panes(Vec<String>),
}

impl OpenFile {
    /// Raw pane entries, before splitting on commas.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            OpenFile::Single(path) => vec![path.as_str()],
            OpenFile::Panes(panes) => panes.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for OpenFile {
    fn from(path: &str) -> Self {
        OpenFile::Single(path.to_string())
    }
}

impl From<String> for OpenFile {
    fn from(path: String) -> Self {
        OpenFile::Single(path)
    }
}

impl From<Vec<String>> for OpenFile {
    fn from(panes: Vec<String>) -> Self {
        OpenFile::Panes(panes)
    }
}

impl From<Vec<&str>> for OpenFile {
    fn from(panes: Vec<&str>) -> Self {
        OpenFile::Panes(panes.into_iter().map(str::to_string).collect())
    }
}
