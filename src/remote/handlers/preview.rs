//! Preview handlers.

use serde_json::Value;
use url::Url;

use crate::protocol::{Payload, RequestEnvelope, ResponseEnvelope};
use crate::remote::context::HandlerContext;
use crate::remote::registry::CommandHandler;
use crate::remote::validation::clean_preview_path;

/// `SDK_GET_PREVIEW_URL`: replies `{url}` or fails when no preview runs.
pub struct GetPreviewUrl;

impl CommandHandler for GetPreviewUrl {
    fn handle(&self, _request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        match ctx.state().preview_url.clone() {
            Some(url) => {
                let mut result = Payload::new();
                result.insert("url".to_string(), Value::String(url));
                ctx.success(result)
            }
            None => ctx.error("No preview URL found"),
        }
    }
}

/// `SDK_SET_PREVIEW_URL`: rewrite the path of the current preview URL.
pub struct SetPreviewUrl;

impl CommandHandler for SetPreviewUrl {
    fn handle(&self, request: &RequestEnvelope, ctx: &mut HandlerContext<'_>) -> ResponseEnvelope {
        let raw = request.field("path");
        let path = clean_preview_path(raw);
        if path.is_empty() {
            let shown = match raw {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            return ctx.error(format!("Invalid path '{}'", shown));
        }

        let Some(current) = ctx.state().preview_url.clone() else {
            return ctx.error("Server not running");
        };
        let mut url = match Url::parse(&current) {
            Ok(url) => url,
            Err(e) => return ctx.error(format!("Invalid preview URL '{}': {}", current, e)),
        };
        url.set_path(&path);

        let updated = url.to_string();
        log::debug!("Preview URL {} -> {}", current, updated);
        ctx.patch_state(|state| state.preview_url = Some(updated));
        ctx.success_empty()
    }
}
