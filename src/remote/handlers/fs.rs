//! Filesystem handlers.

use serde_json::Value;

use crate::protocol::{Payload, RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::registry::CommandHandler;

/// `SDK_GET_FS_SNAPSHOT`: every file as a result field. An empty project
/// replies with no result fields, which the host sees as "no result".
pub struct GetFsSnapshot;

impl CommandHandler for GetFsSnapshot {
    fn handle(&self, _request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let files: Payload = ctx
            .project()
            .files
            .iter()
            .map(|(path, contents)| (path.clone(), Value::String(contents.clone())))
            .collect();
        ctx.success(files)
    }
}

/// `SDK_APPLY_FS_DIFF`: merge `create` over the files, then delete every
/// `destroy` path. Shape is checked by the host, so this never fails.
pub struct ApplyFsDiff;

impl CommandHandler for ApplyFsDiff {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let create: Vec<(String, String)> = request
            .field("create")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(path, contents)| {
                        contents.as_str().map(|c| (path.clone(), c.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let destroy: Vec<String> = request
            .field("destroy")
            .and_then(Value::as_array)
            .map(|paths| paths.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        ctx.patch_project(|project| {
            project.files.extend(create);
            for path in &destroy {
                project.files.remove(path);
            }
        });

        ctx.success_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Project, ProjectTemplate};
    use crate::remote::handlers::test_support::{run, state_for, test_project};
    use serde_json::json;

    #[test]
    fn test_snapshot_returns_files() {
        let mut state = state_for(test_project());
        let response = run(&GetFsSnapshot, &mut state, "SDK_GET_FS_SNAPSHOT", json!({}));
        let result = response.into_outcome().unwrap().unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.contains_key("index.js"));
        assert!(result.contains_key("package.json"));
    }

    #[test]
    fn test_snapshot_of_empty_project_is_none() {
        let mut state = state_for(Project::new("Empty", ProjectTemplate::Html));
        let response = run(&GetFsSnapshot, &mut state, "SDK_GET_FS_SNAPSHOT", json!({}));
        assert!(response.succeeded());
        assert_eq!(response.into_outcome().unwrap(), None);
    }

    #[test]
    fn test_create_into_empty() {
        let mut state = state_for(Project::new("Empty", ProjectTemplate::Html));
        let response = run(
            &ApplyFsDiff,
            &mut state,
            "SDK_APPLY_FS_DIFF",
            json!({"create": {"a": "1"}, "destroy": []}),
        );
        assert_eq!(response.command_name, "SDK_APPLY_FS_DIFF_SUCCESS");
        assert_eq!(state.project().files.len(), 1);
        assert_eq!(state.project().files["a"], "1");
    }

    #[test]
    fn test_destroy_to_empty_then_snapshot_is_none() {
        let mut state = state_for(Project::new("One", ProjectTemplate::Html).with_file("a", "1"));
        run(&ApplyFsDiff, &mut state, "SDK_APPLY_FS_DIFF", json!({"create": {}, "destroy": ["a"]}));
        assert!(state.project().files.is_empty());

        let response = run(&GetFsSnapshot, &mut state, "SDK_GET_FS_SNAPSHOT", json!({}));
        assert_eq!(response.into_outcome().unwrap(), None);
    }

    #[test]
    fn test_create_overwrites_then_destroy_wins() {
        let mut state = state_for(test_project());
        run(
            &ApplyFsDiff,
            &mut state,
            "SDK_APPLY_FS_DIFF",
            json!({"create": {"index.js": "new", "tmp.txt": "x"}, "destroy": ["tmp.txt", "nope"]}),
        );
        assert_eq!(state.project().files["index.js"], "new");
        assert!(!state.project().has_file("tmp.txt"));
        assert_eq!(state.project().files.len(), 2);
    }

    #[test]
    fn test_malformed_diff_still_succeeds() {
        let mut state = state_for(test_project());
        let response = run(&ApplyFsDiff, &mut state, "SDK_APPLY_FS_DIFF", json!({"create": 5}));
        assert!(response.succeeded());
        assert_eq!(state.project().files.len(), 2);
    }
}
