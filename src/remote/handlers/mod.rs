//! Built-in command handlers
//!
//! Each submodule handles a category of commands:
//! - fs: filesystem snapshot and diffs
//! - editor: open files, current file, theme, view, sidebar
//! - preview: preview URL get/set
//! - dependencies: dependency snapshot
//!
//! File-path commands fail on unknown paths. Theme, view and sidebar
//! commands ignore values outside their enumeration and still succeed.

pub mod dependencies;
pub mod editor;
pub mod fs;
pub mod preview;

use crate::protocol::Commands;
use crate::remote::registry::HandlerRegistry;

pub use dependencies::GetDepsSnapshot;
pub use editor::{OpenFileHandler, SetCurrentFile, SetUiTheme, SetUiView, ToggleSidebar};
pub use fs::{ApplyFsDiff, GetFsSnapshot};
pub use preview::{GetPreviewUrl, SetPreviewUrl};

/// Register every built-in handler.
pub fn register_defaults(registry: &mut HandlerRegistry) {
    registry.register(Commands::GET_FS_SNAPSHOT, GetFsSnapshot);
    registry.register(Commands::APPLY_FS_DIFF, ApplyFsDiff);
    registry.register(Commands::GET_DEPS_SNAPSHOT, GetDepsSnapshot);
    registry.register(Commands::OPEN_FILE, OpenFileHandler);
    registry.register(Commands::SET_CURRENT_FILE, SetCurrentFile);
    registry.register(Commands::SET_UI_THEME, SetUiTheme);
    registry.register(Commands::SET_UI_VIEW, SetUiView);
    registry.register(Commands::TOGGLE_SIDEBAR, ToggleSidebar);
    registry.register(Commands::GET_PREVIEW_URL, GetPreviewUrl);
    registry.register(Commands::SET_PREVIEW_URL, SetPreviewUrl);
}
