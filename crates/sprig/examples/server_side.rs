// File: examples/server_side.rs
// Purpose: Minimal server-side routing walkthrough

use sprig::{
    current_context, run_with_context, Params, RequestContext, Resolution, RouteResolver, Router,
    VNode,
};

struct UserLoader;

impl RouteResolver for UserLoader {
    fn on_match(&self, params: &Params, _path: &str, _template: &str) -> Resolution {
        let id = params
            .get("id")
            .map(|v| v.to_param_string())
            .unwrap_or_default();
        Resolution::deferred(async move {
            // A real application would hit a database here.
            if id == "0" {
                return Ok(Resolution::redirect("/users"));
            }
            Ok(Resolution::component(move |_: &Params| {
                VNode::element("article")
                    .with_attr("data-user", id.clone())
                    .with_child(VNode::text(format!("User #{id}")))
            }))
        })
    }

    fn render(&self, node: VNode) -> VNode {
        VNode::element("main").with_child(node)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut router = Router::new();
    router.component("/users", |_: &Params| {
        let greeting = current_context()
            .and_then(|ctx| ctx.session_id().map(str::to_string))
            .map(|s| format!("session {s}"))
            .unwrap_or_else(|| "anonymous".to_string());
        VNode::element("ul")
            .with_attr("data-viewer", greeting)
            .with_child(VNode::text("everyone"))
    })?;
    router.resolver("/users/:id", UserLoader)?;

    for path in ["/users/42", "/users/0", "/users?sort=name"] {
        let context = RequestContext::with_session("demo");
        let html = run_with_context(context, async {
            router
                .resolve(path, |node| async move { Ok(node.render_to_string()) })
                .await
        })
        .await?;
        println!("{path} => {html}");
    }
    Ok(())
}
