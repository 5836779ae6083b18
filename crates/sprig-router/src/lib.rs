//! # Sprig Router
//!
//! Route template matching and pathname plumbing for the Sprig framework:
//! - Static routes (`/about`)
//! - Named parameters (`/users/:id`), delimited by `/`, `-`, or `.`
//! - Variadic parameters (`/files/:path...`) that capture across slashes
//! - Static query constraints (`/search?mode=fast`)
//! - Structured query-string codec with bracket nesting (`a[b][]=1`)
//!
//! Templates compile to a small instruction list interpreted against the
//! parsed path. Compilation is pure and deterministic, so compiled templates
//! can be cached keyed by their source string; matching is allocation-light
//! and writes captures into the caller's params map only on success.
//!
//! ## Example
//!
//! ```
//! use sprig_router::{compile, parse_pathname};
//!
//! let compiled = compile("/users/:id").unwrap();
//! let mut parsed = parse_pathname("/users/123?tab=posts");
//! assert!(compiled.matches(&parsed.path, &mut parsed.params));
//! assert_eq!(parsed.params.get("id").unwrap().as_str(), Some("123"));
//! ```

mod builder;
mod error;
mod params;
mod pathname;
mod query;
mod template;

pub use builder::build_pathname;
pub use error::RouteError;
pub use params::{Params, Value};
pub use pathname::{parse_pathname, ParsedPath};
pub use query::{build_query_string, parse_query_string};
pub use template::{compile, CompiledTemplate};
