// File: src/resolver.rs
// Purpose: Route table and the async resolution state machine

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use sprig_router::{compile, parse_pathname, CompiledTemplate, Params, RouteError};

use crate::component::{Component, RouteTarget};
use crate::config::RouterConfig;
use crate::vnode::VNode;

/// Outcome of a resolver's `on_match`.
///
/// Deferred work is explicit: a resolver that needs to suspend returns
/// `Deferred` with a boxed future yielding the next `Resolution`, and the
/// router awaits layers until it reaches a terminal arm. This keeps "is this
/// a future" out of runtime guessing.
pub enum Resolution {
    /// The resolver leaves the matched target in place.
    Unhandled,
    /// Render this component.
    Component(Arc<dyn Component>),
    /// Restart matching against a new path.
    Redirect(String),
    /// Suspend; the future produces the next resolution step.
    Deferred(BoxFuture<'static, anyhow::Result<Resolution>>),
}

impl Resolution {
    pub fn component(component: impl Component + 'static) -> Self {
        Resolution::Component(Arc::new(component))
    }

    pub fn redirect(path: impl Into<String>) -> Self {
        Resolution::Redirect(path.into())
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Resolution>> + Send + 'static,
    {
        Resolution::Deferred(Box::pin(future))
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Unhandled => f.write_str("Resolution::Unhandled"),
            Resolution::Component(_) => f.write_str("Resolution::Component"),
            Resolution::Redirect(to) => write!(f, "Resolution::Redirect({to:?})"),
            Resolution::Deferred(_) => f.write_str("Resolution::Deferred"),
        }
    }
}

/// A route target that defers component selection and/or wraps rendering.
pub trait RouteResolver: Send + Sync {
    /// Called with the captured params, the path being resolved, and the
    /// template that matched it. The default leaves the target untouched.
    fn on_match(&self, params: &Params, path: &str, template: &str) -> Resolution {
        let _ = (params, path, template);
        Resolution::Unhandled
    }

    /// Wraps the view node before it reaches the render callback. The default
    /// is a pass-through.
    fn render(&self, node: VNode) -> VNode {
        node
    }
}

struct Route {
    template: String,
    compiled: CompiledTemplate,
    target: RouteTarget,
}

/// Ordered route table driving the resolution state machine.
///
/// Templates are compiled once at registration and reused across resolutions;
/// the table itself is immutable during `resolve`, so a `Router` can be
/// shared freely between concurrent requests. Insertion order is the match
/// priority: the first template that matches wins.
pub struct Router {
    routes: Vec<Route>,
    config: RouterConfig,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field(
                "templates",
                &self
                    .routes
                    .iter()
                    .map(|r| r.template.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            config,
        }
    }

    /// Registers a route at the end of the table.
    ///
    /// The template is compiled here, so a malformed template surfaces as
    /// [`RouteError::Syntax`] at registration rather than at request time.
    pub fn add_route(&mut self, template: &str, target: RouteTarget) -> Result<(), RouteError> {
        let compiled = compile(template)?;
        self.routes.push(Route {
            template: template.to_string(),
            compiled,
            target,
        });
        Ok(())
    }

    /// Registers a component route.
    pub fn component(
        &mut self,
        template: &str,
        component: impl Component + 'static,
    ) -> Result<(), RouteError> {
        self.add_route(template, RouteTarget::component(component))
    }

    /// Registers a resolver route.
    pub fn resolver(
        &mut self,
        template: &str,
        resolver: impl RouteResolver + 'static,
    ) -> Result<(), RouteError> {
        self.add_route(template, RouteTarget::resolver(resolver))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Resolves a path to the render callback's output.
    ///
    /// The configured prefix is stripped from the inbound path, the remainder
    /// is parsed and matched against the table in order, and the matched
    /// target is driven through the resolution state machine. Redirects loop
    /// back into matching with a fresh parse of the target path, up to the
    /// configured maximum depth. The callback receives the final view node
    /// and its output is returned untouched; it must be safe to call once per
    /// redirect hop's final resolution (it is invoked exactly once per
    /// successful resolve).
    pub async fn resolve<F, Fut, O>(&self, path: &str, render: F) -> Result<O, RouteError>
    where
        F: Fn(VNode) -> Fut,
        Fut: Future<Output = anyhow::Result<O>>,
    {
        let mut target_path = path
            .strip_prefix(&self.config.prefix)
            .unwrap_or(path)
            .to_string();
        let mut redirects = 0usize;

        'matching: loop {
            let parsed = parse_pathname(&target_path);
            let (path_part, mut params) = (parsed.path, parsed.params);

            let Some(route) = self
                .routes
                .iter()
                .find(|r| r.compiled.matches(&path_part, &mut params))
            else {
                tracing::warn!(path = %path_part, "no matching route");
                return Err(RouteError::NoMatch(path_part));
            };
            tracing::debug!(template = %route.template, path = %path_part, "route matched");

            let mut resolved: Option<Arc<dyn Component>> = None;
            let mut spec: Option<Arc<dyn RouteResolver>> = None;
            match &route.target {
                RouteTarget::Component(component) => resolved = Some(component.clone()),
                RouteTarget::Resolver(resolver) => {
                    spec = Some(resolver.clone());
                    let mut resolution =
                        resolver.on_match(&params, &target_path, &route.template);
                    loop {
                        match resolution {
                            Resolution::Deferred(future) => {
                                resolution = future.await.map_err(RouteError::Resolver)?;
                            }
                            Resolution::Redirect(to) => {
                                redirects += 1;
                                if redirects > self.config.max_redirects {
                                    tracing::warn!(
                                        path = %to,
                                        limit = self.config.max_redirects,
                                        "redirect depth exceeded"
                                    );
                                    return Err(RouteError::RedirectDepthExceeded(
                                        self.config.max_redirects,
                                    ));
                                }
                                tracing::debug!(from = %target_path, to = %to, "redirecting");
                                target_path = to;
                                continue 'matching;
                            }
                            Resolution::Component(component) => {
                                resolved = Some(component);
                                break;
                            }
                            Resolution::Unhandled => break,
                        }
                    }
                }
            }

            // Rendering: a resolved component supplies the node; otherwise an
            // inert container with the captured params always stands in.
            let node = match &resolved {
                Some(component) => component.view(&params),
                None => VNode::container(&params),
            };
            let node = match &spec {
                Some(resolver) => resolver.render(node),
                None => node,
            };
            return render(node).await.map_err(RouteError::Resolver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_router::params;

    fn text_component(content: &'static str) -> impl Component {
        move |_: &Params| VNode::text(content)
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let mut router = Router::new();
        router.component("/users/new", text_component("new")).unwrap();
        router.component("/users/:id", text_component("show")).unwrap();

        let html = router
            .resolve("/users/new", |node| async move {
                Ok(node.render_to_string())
            })
            .await
            .unwrap();
        assert_eq!(html, "new");
    }

    #[tokio::test]
    async fn test_insertion_order_is_priority() {
        let mut router = Router::new();
        router.component("/users/:id", text_component("show")).unwrap();
        router.component("/users/new", text_component("new")).unwrap();

        // The parameter route was registered first, so it shadows /users/new
        let html = router
            .resolve("/users/new", |node| async move {
                Ok(node.render_to_string())
            })
            .await
            .unwrap();
        assert_eq!(html, "show");
    }

    #[tokio::test]
    async fn test_no_match_is_fatal() {
        let router = Router::new();
        let result = router
            .resolve("/missing", |node| async move {
                Ok(node.render_to_string())
            })
            .await;
        assert!(matches!(result, Err(RouteError::NoMatch(_))));
    }

    #[tokio::test]
    async fn test_params_reach_component() {
        let mut router = Router::new();
        router
            .component("/users/:id", |params: &Params| {
                VNode::text(params.get("id").unwrap().to_param_string())
            })
            .unwrap();

        let html = router
            .resolve("/users/42", |node| async move {
                Ok(node.render_to_string())
            })
            .await
            .unwrap();
        assert_eq!(html, "42");
    }

    #[tokio::test]
    async fn test_prefix_stripping() {
        let mut config = RouterConfig::default();
        config.prefix = "/app".to_string();
        let mut router = Router::with_config(config);
        router.component("/home", text_component("home")).unwrap();

        let html = router
            .resolve("/app/home", |node| async move {
                Ok(node.render_to_string())
            })
            .await
            .unwrap();
        assert_eq!(html, "home");
    }

    #[tokio::test]
    async fn test_resolver_fallback_container() {
        struct Passive;
        impl RouteResolver for Passive {}

        let mut router = Router::new();
        router.resolver("/users/:id", Passive).unwrap();

        let node = router
            .resolve("/users/9", |node| async move { Ok(node) })
            .await
            .unwrap();
        assert_eq!(node, VNode::container(&params! { "id" => "9" }));
    }

    #[test]
    fn test_bad_template_fails_at_registration() {
        let mut router = Router::new();
        let result = router.component("/x/:a:b", text_component("x"));
        assert!(matches!(result, Err(RouteError::Syntax { .. })));
    }
}
