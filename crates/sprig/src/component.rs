// File: src/component.rs
// Purpose: Component trait and route targets

use std::sync::Arc;

use sprig_router::Params;

use crate::resolver::RouteResolver;
use crate::vnode::VNode;

/// Something that can produce a view for a set of route parameters.
pub trait Component: Send + Sync {
    fn view(&self, params: &Params) -> VNode;
}

/// Plain functions and closures are components.
impl<F> Component for F
where
    F: Fn(&Params) -> VNode + Send + Sync,
{
    fn view(&self, params: &Params) -> VNode {
        self(params)
    }
}

/// The target a route template maps to: either a component rendered directly,
/// or a resolver that defers component selection and may redirect or wrap
/// rendering.
#[derive(Clone)]
pub enum RouteTarget {
    Component(Arc<dyn Component>),
    Resolver(Arc<dyn RouteResolver>),
}

impl RouteTarget {
    pub fn component(component: impl Component + 'static) -> Self {
        RouteTarget::Component(Arc::new(component))
    }

    pub fn resolver(resolver: impl RouteResolver + 'static) -> Self {
        RouteTarget::Resolver(Arc::new(resolver))
    }
}

impl std::fmt::Debug for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTarget::Component(_) => f.write_str("RouteTarget::Component"),
            RouteTarget::Resolver(_) => f.write_str("RouteTarget::Resolver"),
        }
    }
}
