// File: src/template.rs
// Purpose: Route template compilation and path matching

use crate::error::RouteError;
use crate::params::{Params, Value};
use crate::pathname::parse_pathname;
use crate::query::decode_component;

/// One step of a compiled matcher.
///
/// Templates compile to a flat instruction list interpreted against the
/// parsed path, rather than to closures or a regex: the list is cheap to
/// cache, trivially inspectable in tests, and carries no hidden state.
#[derive(Debug, Clone, PartialEq)]
enum Op {
    /// Exact text, delimiters included.
    Literal(String),
    /// Named parameter: greedily consumes one or more non-`/` characters.
    Capture(String),
    /// Variadic parameter: greedily consumes the remainder, slashes included.
    CaptureRest(String),
}

/// A route template compiled into a deterministic path matcher.
///
/// Compilation is a pure function of the template string, so instances may be
/// cached keyed by their source. Matching writes captured parameters into the
/// caller-supplied params map on success; a failed match leaves the map
/// untouched.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    source: String,
    ops: Vec<Op>,
    keys: Vec<String>,
    constraints: Params,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '/' | '.' | '-')
}

/// Verifies that every template parameter is delimited by `/`, `-`, or `.`.
///
/// Two parameters in the same delimiter-free run (`:a:b`, or `:a...:b` after
/// a variadic marker) have no boundary the matcher could split on.
pub(crate) fn check_delimiters(template: &str) -> Result<(), RouteError> {
    let cs: Vec<char> = template.chars().collect();
    for p in 0..cs.len() {
        if cs[p] != ':' {
            continue;
        }
        let mut j = p + 1;
        while j < cs.len() && !is_delimiter(cs[j]) {
            if cs[j] == ':' && j > p + 1 {
                return Err(RouteError::syntax(template));
            }
            j += 1;
        }
        // The run ended at a dot: a variadic marker followed directly by
        // another parameter is just as undelimited.
        if j > p + 1
            && j + 3 < cs.len()
            && cs[j] == '.'
            && cs[j + 1] == '.'
            && cs[j + 2] == '.'
            && cs[j + 3] == ':'
        {
            return Err(RouteError::syntax(template));
        }
    }
    Ok(())
}

/// Compiles a route template into a matcher.
///
/// The template is a `/`-delimited path with `:name` parameters (`:name...`
/// for variadic), optional static `?key=value` query constraints, and an
/// ignored `#fragment`. Fails with [`RouteError::Syntax`] when parameter
/// names are not separated by `/`, `-`, or `.`.
pub fn compile(template: &str) -> Result<CompiledTemplate, RouteError> {
    check_delimiters(template)?;

    let data = parse_pathname(template);
    let cs: Vec<char> = data.path.chars().collect();

    let mut ops = Vec::new();
    let mut keys = Vec::new();
    let mut literal = String::new();
    let mut i = 0;
    while i < cs.len() {
        if cs[i] == ':' && i + 1 < cs.len() && !is_delimiter(cs[i + 1]) {
            if !literal.is_empty() {
                ops.push(Op::Literal(std::mem::take(&mut literal)));
            }
            let start = i + 1;
            let mut j = start;
            while j < cs.len() && !is_delimiter(cs[j]) {
                j += 1;
            }
            let name: String = cs[start..j].iter().collect();
            let variadic = cs.get(j) == Some(&'.')
                && cs.get(j + 1) == Some(&'.')
                && cs.get(j + 2) == Some(&'.');
            if variadic {
                ops.push(Op::CaptureRest(name.clone()));
                i = j + 3;
            } else {
                ops.push(Op::Capture(name.clone()));
                i = j;
            }
            keys.push(name);
        } else {
            literal.push(cs[i]);
            i += 1;
        }
    }
    if !literal.is_empty() {
        ops.push(Op::Literal(literal));
    }

    Ok(CompiledTemplate {
        source: template.to_string(),
        ops,
        keys,
        constraints: data.params,
    })
}

impl CompiledTemplate {
    /// The template string this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names captured on a successful match, in template order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Matches a normalized path against this template.
    ///
    /// `params` must hold the already-decoded query parameters of the request:
    /// static query constraints from the template are checked against it, and
    /// on success the captured path parameters are written into it (existing
    /// keys of the same name are overwritten). On failure `params` is left
    /// exactly as it was.
    pub fn matches(&self, path: &str, params: &mut Params) -> bool {
        for (key, expected) in &self.constraints {
            if params.get(key) != Some(expected) {
                return false;
            }
        }

        let mut caps: Vec<&str> = Vec::new();
        if !match_at(&self.ops, 0, path, &mut caps) {
            return false;
        }
        for (name, raw) in self.keys.iter().zip(caps) {
            params.insert(name.clone(), Value::Str(decode_component(raw)));
        }
        true
    }
}

/// Interprets the instruction list against the remaining path, backtracking
/// through capture lengths so earlier parameters stay as long as possible
/// while still letting the rest of the template match.
fn match_at<'a>(ops: &[Op], k: usize, rest: &'a str, caps: &mut Vec<&'a str>) -> bool {
    let Some(op) = ops.get(k) else {
        return rest.is_empty();
    };
    match op {
        Op::Literal(lit) => match rest.strip_prefix(lit.as_str()) {
            Some(tail) => match_at(ops, k + 1, tail, caps),
            None => false,
        },
        Op::Capture(_) => {
            let limit = rest.find('/').unwrap_or(rest.len());
            if limit == 0 {
                return false;
            }
            let seg = &rest[..limit];
            let mut ends: Vec<usize> = seg.char_indices().map(|(i, _)| i).skip(1).collect();
            ends.push(limit);
            for &end in ends.iter().rev() {
                caps.push(&rest[..end]);
                if match_at(ops, k + 1, &rest[end..], caps) {
                    return true;
                }
                caps.pop();
            }
            false
        }
        Op::CaptureRest(_) => {
            let mut ends: Vec<usize> = rest.char_indices().map(|(i, _)| i).collect();
            ends.push(rest.len());
            for &end in ends.iter().rev() {
                caps.push(&rest[..end]);
                if match_at(ops, k + 1, &rest[end..], caps) {
                    return true;
                }
                caps.pop();
            }
            false
        }
    }
}
