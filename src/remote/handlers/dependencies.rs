//! Dependency snapshot handler.

use rand::Rng;
use serde_json::Value;

use crate::domain::ProjectTemplate;
use crate::protocol::{Payload, RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::registry::CommandHandler;

const MANIFEST: &str = "package.json";

/// `SDK_GET_DEPS_SNAPSHOT`
///
/// Node projects report what `package.json` declares under `dependencies`
/// and `devDependencies`. Other templates report a made-up resolved version
/// for each declared dependency.
pub struct GetDepsSnapshot;

impl CommandHandler for GetDepsSnapshot {
    fn handle(&self, _request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let project = ctx.project();
        let result = if project.template == ProjectTemplate::Node {
            let Some(manifest) = project.files.get(MANIFEST).filter(|m| !m.is_empty()) else {
                return ctx.error(format!(
                    "Could not find {} in project with template '{}'",
                    MANIFEST, project.template
                ));
            };
            match manifest_dependencies(manifest) {
                Some(deps) => deps,
                None => {
                    return ctx.error(format!(
                        "Could not parse {} in project with template '{}'",
                        MANIFEST, project.template
                    ));
                }
            }
        } else {
            let mut rng = rand::rng();
            project
                .dependencies
                .iter()
                .flatten()
                .map(|(name, _)| {
                    let version = format!(
                        "{}.{}.{}",
                        rng.random_range(0..=12),
                        rng.random_range(0..=20),
                        rng.random_range(0..=9)
                    );
                    (name.clone(), Value::String(version))
                })
                .collect()
        };
        ctx.success(result)
    }
}

/// `dependencies` merged with `devDependencies`; `None` if the manifest is not
/// JSON or is `null`. Any other non-object manifest declares nothing.
fn manifest_dependencies(manifest: &str) -> Option<Payload> {
    let parsed: Value = serde_json::from_str(manifest).ok()?;
    if parsed.is_null() {
        return None;
    }

    let mut deps = Payload::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(entries) = parsed.get(section).and_then(Value::as_object) {
            for (name, version) in entries {
                if version.is_string() {
                    deps.insert(name.clone(), version.clone());
                }
            }
        }
    }
    Some(deps)
}
