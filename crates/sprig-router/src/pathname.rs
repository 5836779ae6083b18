// File: src/pathname.rs
// Purpose: URL pathname parsing into a normalized path plus query params

use crate::params::Params;
use crate::query::parse_query_string;

/// A URL split into its normalized path and decoded query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    /// Always starts with `/`; runs of slashes are collapsed to one.
    pub path: String,
    /// Decoded query parameters; empty when the URL carries no `?`.
    pub params: Params,
}

/// Splits a URL string into a normalized path and decoded query params.
///
/// The query section ends at the first `#` (or the end of the string); the
/// path ends at the first `?` (or the end of the query section). Runs of two
/// or more `/` collapse to one, an empty path becomes `/`, and a missing
/// leading `/` is prepended. A trailing slash is preserved.
///
/// A leading scheme (`http://`) receives no special handling and is treated
/// as literal path characters. This mirrors the naive split semantics of the
/// wire format; callers routing full URLs must strip the origin themselves.
pub fn parse_pathname(url: &str) -> ParsedPath {
    let query_index = url.find('?');
    let hash_index = url.find('#');
    let query_end = hash_index.unwrap_or(url.len());
    let path_end = query_index.unwrap_or(query_end);

    let mut path = collapse_slashes(&url[..path_end]);
    if path.is_empty() {
        path.push('/');
    } else if !path.starts_with('/') {
        path.insert(0, '/');
    }

    let params = match query_index {
        Some(qi) if qi + 1 < query_end => parse_query_string(&url[qi + 1..query_end]),
        _ => Params::new(),
    };

    ParsedPath { path, params }
}

fn collapse_slashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_was_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if !prev_was_slash {
                out.push('/');
            }
            prev_was_slash = true;
        } else {
            out.push(c);
            prev_was_slash = false;
        }
    }
    out
}
