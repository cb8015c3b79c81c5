//! Domain types shared by the host façade and the simulated VM
//!
//! - Project: title, template, files, dependencies, settings
//! - ProjectOptions: initial editor state for an embedded project
//! - UiTheme / UiView / OpenFile: editor UI values
//! - FsDiff: a batch of file creations and deletions

pub mod diff;
pub mod project;
pub mod ui;

pub use diff::FsDiff;
pub use project::{
    CompileAction, CompileSettings, CompileTrigger, Project, ProjectDependencies, ProjectFiles,
    ProjectOptions, ProjectSettings, ProjectTemplate,
};
pub use ui::{OpenFile, UiTheme, UiView};
