//! State held by the simulated VM.
//!
//! Two independent aggregates: the project (files and metadata) and the
//! editor/app state. Only command handlers mutate either, one command at a time.

use serde::{Deserialize, Serialize};

use crate::domain::{Project, ProjectOptions, UiTheme, UiView};
use crate::remote::validation::{file_to_panes, filter_panes};

/// Preview origin used when none is configured.
pub const DEFAULT_PREVIEW_ORIGIN: &str = "http://localhost:8080";

/// Editor/app state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_file: Option<String>,
    /// Every path in here existed in the project when it was set.
    pub editor_panes: Vec<Vec<String>>,
    pub preview_url: Option<String>,
    pub theme: UiTheme,
    pub view: UiView,
    pub sidebar_visible: bool,
}

impl AppState {
    /// Initial state for `project` opened with `options`.
    ///
    /// Opens `options.open_file` (default: the first file), focuses the first
    /// opened file, and starts a preview at `preview_origin` unless the
    /// project is a node project.
    pub fn initial(project: &Project, options: &ProjectOptions, preview_origin: &str) -> Self {
        let panes = match &options.open_file {
            Some(open_file) => file_to_panes(open_file.entries()),
            None => project
                .files
                .keys()
                .next()
                .map(|first| file_to_panes(vec![first.as_str()]))
                .unwrap_or_default(),
        };
        let editor_panes = filter_panes(panes, &project.files);
        let current_file = editor_panes.iter().flatten().next().cloned();
        let preview_url = if project.template.is_node() {
            None
        } else {
            Some(format!("{}/", preview_origin.trim_end_matches('/')))
        };

        Self {
            current_file,
            editor_panes,
            preview_url,
            theme: options.theme.unwrap_or_default(),
            view: options.view.unwrap_or_default(),
            sidebar_visible: options.show_sidebar.unwrap_or(false),
        }
    }
}

/// Everything the simulated VM knows.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteState {
    project: Project,
    app: AppState,
}

impl RemoteState {
    pub fn new(project: Project, options: &ProjectOptions, preview_origin: &str) -> Self {
        let app = AppState::initial(&project, options, preview_origin);
        Self { project, app }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Apply `patch` to the project as one step.
    pub fn patch_project(&mut self, patch: impl FnOnce(&mut Project)) {
        patch(&mut self.project);
    }

    /// Apply `patch` to the app state as one step.
    pub fn patch_app(&mut self, patch: impl FnOnce(&mut AppState)) {
        patch(&mut self.app);
    }
}
