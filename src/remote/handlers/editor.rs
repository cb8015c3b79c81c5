//! Editor handlers: open files, current file, theme, view, sidebar.

use serde_json::Value;

use crate::domain::{UiTheme, UiView};
use crate::protocol::{RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::registry::CommandHandler;
use crate::remote::validation::{filter_panes, panes_from_value};

/// `SDK_SET_UI_THEME`
pub struct SetUiTheme;

impl CommandHandler for SetUiTheme {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        if let Some(theme) = request.field("theme").and_then(UiTheme::from_value) {
            ctx.patch_state(|state| state.theme = theme);
        }
        ctx.success_empty()
    }
}

/// `SDK_SET_UI_VIEW`
pub struct SetUiView;

impl CommandHandler for SetUiView {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        if let Some(view) = request.field("view").and_then(UiView::from_value) {
            ctx.patch_state(|state| state.view = view);
        }
        ctx.success_empty()
    }
}

/// `SDK_TOGGLE_SIDEBAR`
pub struct ToggleSidebar;

impl CommandHandler for ToggleSidebar {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        if let Some(visible) = request.field("visible").and_then(Value::as_bool) {
            ctx.patch_state(|state| state.sidebar_visible = visible);
        }
        ctx.success_empty()
    }
}

/// `SDK_OPEN_FILE`: replace the editor panes with the requested paths that
/// exist. Fails, listing every requested path, when none of them do.
pub struct OpenFileHandler;

impl CommandHandler for OpenFileHandler {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let raw_panes = panes_from_value(request.field("path"));
        let editor_panes = filter_panes(raw_panes.clone(), &ctx.project().files);

        if editor_panes.is_empty() {
            let requested: Vec<String> = raw_panes
                .iter()
                .flatten()
                .map(|path| format!("'{}'", path))
                .collect();
            return ctx.error(format!("No file found for: {}", requested.join(", ")));
        }

        ctx.patch_state(|state| state.editor_panes = editor_panes);
        ctx.success_empty()
    }
}

/// `SDK_SET_CURRENT_FILE`
pub struct SetCurrentFile;

impl CommandHandler for SetCurrentFile {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let path = match request.field("path") {
            Some(Value::String(path)) if ctx.project().has_file(path) => path.clone(),
            Some(Value::String(path)) => return ctx.error(format!("File not found: '{}'", path)),
            Some(other) => return ctx.error(format!("File not found: '{}'", other)),
            None => return ctx.error("File not found: ''"),
        };

        ctx.patch_state(|state| state.current_file = Some(path));
        ctx.success_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Project, ProjectTemplate};
    use crate::remote::handlers::test_support::{run, state_for, test_project};
    use serde_json::json;

    fn rejection(response: ResponseEnvelope) -> String {
        response.into_outcome().unwrap_err().to_string()
    }

    #[test]
    fn test_theme_and_view() {
        let mut state = state_for(test_project());
        let response = run(&SetUiTheme, &mut state, "SDK_SET_UI_THEME", json!({"theme": "dark"}));
        assert_eq!(response.into_outcome().unwrap(), None);
        assert_eq!(state.app().theme, UiTheme::Dark);

        run(&SetUiView, &mut state, "SDK_SET_UI_VIEW", json!({"view": "preview"}));
        assert_eq!(state.app().view, UiView::Preview);
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let mut state = state_for(test_project());
        let response = run(&SetUiTheme, &mut state, "SDK_SET_UI_THEME", json!({"theme": "neon"}));
        assert!(response.succeeded());
        assert_eq!(state.app().theme, UiTheme::Default);

        let response = run(&SetUiView, &mut state, "SDK_SET_UI_VIEW", json!({}));
        assert!(response.succeeded());
        assert_eq!(state.app().view, UiView::Default);

        let response = run(&ToggleSidebar, &mut state, "SDK_TOGGLE_SIDEBAR", json!({"visible": "yes"}));
        assert!(response.succeeded());
        assert!(!state.app().sidebar_visible);
    }

    #[test]
    fn test_toggle_sidebar() {
        let mut state = state_for(test_project());
        run(&ToggleSidebar, &mut state, "SDK_TOGGLE_SIDEBAR", json!({"visible": true}));
        assert!(state.app().sidebar_visible);
        run(&ToggleSidebar, &mut state, "SDK_TOGGLE_SIDEBAR", json!({"visible": false}));
        assert!(!state.app().sidebar_visible);
    }

    #[test]
    fn test_open_file_keeps_existing_paths() {
        let project = test_project().with_file("README.md", "Hi").with_file("a", "aaa").with_file("b", "bbb");
        let mut state = state_for(project);
        let response = run(
            &OpenFileHandler,
            &mut state,
            "SDK_OPEN_FILE",
            json!({"path": ["index.js,b,README.md,missing", "package.json,a"]}),
        );
        assert!(response.succeeded());
        assert_eq!(
            state.app().editor_panes,
            vec![
                vec!["index.js".to_string(), "b".to_string(), "README.md".to_string()],
                vec!["package.json".to_string(), "a".to_string()],
            ]
        );
    }

    #[test]
    fn test_open_file_none_found() {
        let mut state = state_for(Project::new("P", ProjectTemplate::Html).with_file("a", "aaa"));
        let before = state.app().clone();

        let response = run(&OpenFileHandler, &mut state, "SDK_OPEN_FILE", json!({"path": "foo.bar"}));
        assert_eq!(rejection(response), "SDK_OPEN_FILE_FAILURE: No file found for: 'foo.bar'");

        let response = run(
            &OpenFileHandler,
            &mut state,
            "SDK_OPEN_FILE",
            json!({"path": ["index.js", "foo.bar"]}),
        );
        assert_eq!(
            rejection(response),
            "SDK_OPEN_FILE_FAILURE: No file found for: 'index.js', 'foo.bar'"
        );
        assert_eq!(state.app(), &before);
    }

    #[test]
    fn test_set_current_file() {
        let project = Project::new("P", ProjectTemplate::Html)
            .with_file("README.md", "Hi.")
            .with_file(".stackblitzrc", "{}");
        let mut state = state_for(project);

        let response = run(&SetCurrentFile, &mut state, "SDK_SET_CURRENT_FILE", json!({"path": "README.md"}));
        assert!(response.succeeded());
        assert_eq!(state.app().current_file.as_deref(), Some("README.md"));

        let response = run(&SetCurrentFile, &mut state, "SDK_SET_CURRENT_FILE", json!({"path": ".gitignore"}));
        assert_eq!(
            rejection(response),
            "SDK_SET_CURRENT_FILE_FAILURE: File not found: '.gitignore'"
        );
        assert_eq!(state.app().current_file.as_deref(), Some("README.md"));
    }
}
