// Sprig - server-side component routing
// Route templates, structured params, and async resolution for rendered components

pub mod component;
pub mod config;
pub mod request_context;
pub mod resolver;
pub mod vnode;

// Re-export the routing primitives from sprig-router
pub use sprig_router::{
    build_pathname, build_query_string, compile, params, parse_pathname, parse_query_string,
    CompiledTemplate, Params, ParsedPath, RouteError, Value,
};

// Re-export core types
pub use component::{Component, RouteTarget};
pub use config::{RouterConfig, DEFAULT_MAX_REDIRECTS};
pub use request_context::{current_context, run_with_context, RequestContext, StateEntry};
pub use resolver::{Resolution, RouteResolver, Router};
pub use vnode::VNode;
