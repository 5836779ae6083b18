// File: src/query.rs
// Purpose: Query-string codec between wire form and structured params

use std::collections::HashMap;

use crate::params::{Params, Value};

/// Key names that abort an entire assignment during decode.
///
/// The wire grammar lets clients address arbitrary nesting levels, so key
/// names that could collide with ambient object machinery are rejected
/// outright rather than filtered per-level.
const UNSAFE_KEYS: &[&str] = &["__proto__"];

/// Encodes a parameter tree into a flat `a=b&c[0]=d` query string.
///
/// Lists destructure to `key[0]`, `key[1]`, …; nested maps to `key[sub]`.
/// `Null` and empty-string leaves emit the bare key with no `=` (jQuery-style
/// bare key semantics). Pair order follows the iteration order of the tree.
pub fn build_query_string(params: &Params) -> String {
    let mut args: Vec<String> = Vec::new();
    for (key, value) in params {
        destructure(key, value, &mut args);
    }
    args.join("&")
}

fn destructure(key: &str, value: &Value, args: &mut Vec<String>) {
    match value {
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                destructure(&format!("{key}[{i}]"), item, args);
            }
        }
        Value::Map(map) => {
            for (sub, item) in map {
                destructure(&format!("{key}[{sub}]"), item, args);
            }
        }
        Value::Null => args.push(urlencoding::encode(key).into_owned()),
        Value::Str(s) if s.is_empty() => args.push(urlencoding::encode(key).into_owned()),
        Value::Str(s) => args.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(s)
        )),
        Value::Bool(b) => args.push(format!("{}={}", urlencoding::encode(key), b)),
    }
}

/// Decodes a flat query string into a structured parameter tree.
///
/// Accepts an optional leading `?`. Entries split on `&`, then on the first
/// `=` (a missing `=` yields an empty-string value). The literals `"true"`
/// and `"false"` coerce to booleans; nothing else is coerced. Bracketed keys
/// nest: `a[b][c]=1` builds maps, `a[]=x&a[]=y` appends to a list via a
/// per-path auto-index counter. Later duplicate scalar keys overwrite earlier
/// ones. Keys containing an unsafe level name are dropped entirely.
pub fn parse_query_string(input: &str) -> Params {
    let string = input.strip_prefix('?').unwrap_or(input);
    if string.is_empty() {
        return Params::new();
    }

    let mut data = Value::Map(Params::new());
    let mut counters: HashMap<String, usize> = HashMap::new();

    for entry in string.split('&') {
        let (raw_key, raw_value) = match entry.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (entry, None),
        };
        let key = decode_component(raw_key);
        let value = match raw_value {
            Some(v) => coerce(decode_component(v)),
            None => Value::Str(String::new()),
        };

        let levels = split_levels(&key);
        assign(&mut data, &levels, 0, value, &mut counters);
    }

    match data {
        Value::Map(map) => map,
        _ => unreachable!("top-level container is always a map"),
    }
}

/// Percent-decodes one key or value component.
///
/// A malformed encoding is recovered locally: the original raw substring is
/// returned unchanged instead of failing the whole parse.
pub(crate) fn decode_component(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn coerce(s: String) -> Value {
    match s.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(s),
    }
}

/// Splits a bracketed key into nesting levels.
///
/// `a[b][c]` → `["a", "b", "c"]`; `a[]` → `["a", ""]` (a trailing empty level
/// means auto-index). Keys without brackets are a single level.
fn split_levels(key: &str) -> Vec<String> {
    let mut levels = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => levels.push(std::mem::take(&mut current)),
            ']' => {
                levels.push(std::mem::take(&mut current));
                if chars.peek() == Some(&'[') {
                    chars.next();
                }
            }
            _ => current.push(c),
        }
    }
    levels.push(current);
    // A bracketed key always ends with a closing bracket, which leaves a
    // trailing empty split to discard.
    if key.contains('[') {
        levels.pop();
    }
    levels
}

/// Whether a level addresses a list slot: an auto-index marker (``""``) or a
/// string with a leading integer.
fn is_index_level(level: &str) -> bool {
    if level.is_empty() {
        return true;
    }
    let digits = level.strip_prefix(['-', '+']).unwrap_or(level);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn new_container(next_is_index: bool) -> Value {
    if next_is_index {
        Value::List(Vec::new())
    } else {
        Value::Map(Params::new())
    }
}

fn assign(
    cursor: &mut Value,
    levels: &[String],
    j: usize,
    value: Value,
    counters: &mut HashMap<String, usize>,
) {
    let raw = &levels[j];
    if UNSAFE_KEYS.contains(&raw.as_str()) {
        // Unsafe level name aborts the whole assignment for this key.
        return;
    }

    let level: String = if raw.is_empty() {
        let prefix = levels[..j].join(",");
        let counter = counters.entry(prefix).or_insert_with(|| match cursor {
            Value::List(list) => list.len(),
            _ => 0,
        });
        let index = *counter;
        *counter += 1;
        index.to_string()
    } else {
        raw.clone()
    };

    let last = j == levels.len() - 1;
    let next_is_index = levels
        .get(j + 1)
        .map(|next| is_index_level(next))
        .unwrap_or(false);

    match cursor {
        Value::Map(map) => {
            if last {
                map.insert(level, value);
                return;
            }
            let slot = map
                .entry(level)
                .or_insert_with(|| new_container(next_is_index));
            if slot.is_null() {
                *slot = new_container(next_is_index);
            }
            match slot {
                Value::Map(_) | Value::List(_) => assign(slot, levels, j + 1, value, counters),
                // A scalar already occupies this slot; deeper writes are lost.
                _ => {}
            }
        }
        Value::List(list) => {
            let Ok(index) = level.parse::<usize>() else {
                // Non-numeric key against a list slot has nowhere to land.
                return;
            };
            if index >= list.len() {
                list.resize(index + 1, Value::Null);
            }
            if last {
                list[index] = value;
                return;
            }
            let slot = &mut list[index];
            if slot.is_null() {
                *slot = new_container(next_is_index);
            }
            match slot {
                Value::Map(_) | Value::List(_) => assign(slot, levels, j + 1, value, counters),
                _ => {}
            }
        }
        _ => {}
    }
}
