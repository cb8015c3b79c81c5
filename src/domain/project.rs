//! Project definition.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ui::{OpenFile, UiTheme, UiView};
use crate::error::VmError;

/// Path → file contents.
pub type ProjectFiles = BTreeMap<String, String>;

/// Package name → version specifier.
pub type ProjectDependencies = BTreeMap<String, String>;

/// Project template. Only `node` changes runtime behavior: it has no static
/// preview and reads its dependencies from `package.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectTemplate {
    AngularCli,
    CreateReactApp,
    Html,
    Javascript,
    Node,
    Polymer,
    Typescript,
    Vue,
}

impl ProjectTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTemplate::AngularCli => "angular-cli",
            ProjectTemplate::CreateReactApp => "create-react-app",
            ProjectTemplate::Html => "html",
            ProjectTemplate::Javascript => "javascript",
            ProjectTemplate::Node => "node",
            ProjectTemplate::Polymer => "polymer",
            ProjectTemplate::Typescript => "typescript",
            ProjectTemplate::Vue => "vue",
        }
    }

    /// Node projects run a dev server on demand instead of serving a static preview.
    pub fn is_node(&self) -> bool {
        matches!(self, ProjectTemplate::Node)
    }
}

impl fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectTemplate {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| VmError::Validation(format!("Unknown project template: '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileTrigger {
    Auto,
    Keystroke,
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileAction {
    Hmr,
    Refresh,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<CompileTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<CompileAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_console: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<CompileSettings>,
}

/// A project as held by the embedded VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template: ProjectTemplate,
    #[serde(default)]
    pub files: ProjectFiles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<ProjectDependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
}

impl Project {
    /// Create an empty project.
    pub fn new(title: impl Into<String>, template: ProjectTemplate) -> Self {
        Self {
            title: title.into(),
            description: None,
            template,
            files: ProjectFiles::new(),
            dependencies: None,
            settings: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Declare a dependency.
    pub fn with_dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependencies
            .get_or_insert_with(ProjectDependencies::new)
            .insert(name.into(), version.into());
        self
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// Initial editor state for an embedded project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOptions {
    /// File(s) to open. Defaults to the project's first file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_file: Option<OpenFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<UiTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<UiView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_sidebar: Option<bool>,
}
