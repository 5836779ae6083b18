// File: src/builder.rs
// Purpose: Reassembling templates plus params into concrete paths

use crate::error::RouteError;
use crate::params::{Params, Value};
use crate::query::build_query_string;
use crate::template::check_delimiters;

/// Builds a concrete path from a template and a parameter tree.
///
/// Without params the template is returned verbatim (after the same
/// delimiter-syntax check compilation applies). With params, every `:name`
/// and `:name...` occurrence in the path portion is substituted from the tree
/// and removed from a working copy; whatever remains in the copy is appended
/// as a query string. Plain parameters are percent-encoded; variadic values
/// are inserted raw since they may legitimately contain `/`. An absent or
/// `Null` parameter leaves its placeholder text untouched.
///
/// Append order after substitution: the template's own static query string,
/// then any query the substitution introduced, then the encoded leftover
/// params, then the original fragment, then any fragment the substitution
/// introduced; `?` joins the first query piece and `&` the rest.
pub fn build_pathname(template: &str, params: Option<&Params>) -> Result<String, RouteError> {
    check_delimiters(template)?;
    let Some(params) = params else {
        return Ok(template.to_string());
    };

    let query_index = template.find('?');
    let hash_index = template.find('#');
    let query_end = hash_index.unwrap_or(template.len());
    let path_end = query_index.unwrap_or(query_end);
    let path = &template[..path_end];

    let mut query = params.clone();
    let resolved = substitute(path, params, &mut query);

    // The substitution itself may introduce a query or fragment when a
    // parameter value contains `?` or `#`.
    let new_query_index = resolved.find('?');
    let new_hash_index = resolved.find('#');
    let new_query_end = new_hash_index.unwrap_or(resolved.len());
    let new_path_end = new_query_index.unwrap_or(new_query_end);

    let mut result = resolved[..new_path_end].to_string();
    if let Some(qi) = query_index {
        result.push_str(&template[qi..query_end]);
    }
    if let Some(nqi) = new_query_index {
        result.push(if query_index.is_none() { '?' } else { '&' });
        result.push_str(&resolved[nqi + 1..new_query_end]);
    }
    let querystring = build_query_string(&query);
    if !querystring.is_empty() {
        result.push(if query_index.is_none() && new_query_index.is_none() {
            '?'
        } else {
            '&'
        });
        result.push_str(&querystring);
    }
    if let Some(hi) = hash_index {
        result.push_str(&template[hi..]);
    }
    if let Some(nhi) = new_hash_index {
        result.push(if hash_index.is_none() { '#' } else { '&' });
        result.push_str(&resolved[nhi + 1..]);
    }
    Ok(result)
}

fn substitute(path: &str, params: &Params, query: &mut Params) -> String {
    let cs: Vec<char> = path.chars().collect();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;
    while i < cs.len() {
        if cs[i] == ':' && i + 1 < cs.len() && !matches!(cs[i + 1], '/' | '.' | '-') {
            let start = i + 1;
            let mut j = start;
            while j < cs.len() && !matches!(cs[j], '/' | '.' | '-') {
                j += 1;
            }
            let name: String = cs[start..j].iter().collect();
            let variadic = cs.get(j) == Some(&'.')
                && cs.get(j + 1) == Some(&'.')
                && cs.get(j + 2) == Some(&'.');
            let end = if variadic { j + 3 } else { j };

            // The placeholder claims this key even when it is left verbatim.
            query.shift_remove(&name);

            match params.get(&name) {
                None | Some(Value::Null) => out.extend(&cs[i..end]),
                Some(value) => {
                    let text = value.to_param_string();
                    if variadic {
                        out.push_str(&text);
                    } else {
                        out.push_str(&urlencoding::encode(&text));
                    }
                }
            }
            i = end;
        } else {
            out.push(cs[i]);
            i += 1;
        }
    }
    out
}
