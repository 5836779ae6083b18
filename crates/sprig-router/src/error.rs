// File: src/error.rs
// Purpose: Error taxonomy for routing and resolution

use thiserror::Error;

/// Errors surfaced by template compilation and route resolution.
///
/// All variants are fatal to the operation that produced them and propagate
/// unchanged to the caller; the router performs no retries. Malformed percent
/// encodings are not represented here: the codec recovers them locally by
/// falling back to the raw substring.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Template parameter names not separated by `/`, `-`, or `.`.
    #[error("template parameter names must be separated by '/', '-', or '.': {template}")]
    Syntax { template: String },

    /// No entry in the route table matched the path.
    #[error("no route matched path: {0}")]
    NoMatch(String),

    /// A redirect chain exceeded the configured maximum depth.
    #[error("maximum redirect depth exceeded after {0} redirects")]
    RedirectDepthExceeded(usize),

    /// A user-supplied resolver or render callback failed.
    #[error("route resolver failed: {0}")]
    Resolver(#[from] anyhow::Error),
}

impl RouteError {
    pub fn syntax(template: impl Into<String>) -> Self {
        RouteError::Syntax {
            template: template.into(),
        }
    }
}
