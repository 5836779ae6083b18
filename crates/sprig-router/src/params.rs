// File: src/params.rs
// Purpose: Structured parameter tree shared by the query codec and matcher

use indexmap::IndexMap;

/// Ordered string-keyed parameter map.
///
/// Insertion order is significant: the query codec emits pairs in iteration
/// order, and route tables rely on params arriving in the order they were
/// captured.
pub type Params = IndexMap<String, Value>;

/// A single node in a decoded parameter tree.
///
/// Values are strings, booleans (only the literals `"true"`/`"false"` coerce
/// during decode), lists, or nested maps. Numeric strings are never
/// auto-coerced. `Null` marks sparse list slots and "do not interpolate"
/// placeholders for the pathname builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    List(Vec<Value>),
    Map(Params),
    Null,
}

impl Value {
    /// String form used when a value is interpolated into a path segment.
    pub fn to_param_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_param_string()).collect();
                parts.join(",")
            }
            Value::Map(_) => "[Object]".to_string(),
            Value::Null => String::new(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Params> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Str(n.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Str(n.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Params> for Value {
    fn from(map: Params) -> Self {
        Value::Map(map)
    }
}

/// Convenience constructor for a params map from literal pairs.
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Params::new();
        $(map.insert($key.to_string(), $crate::Value::from($value));)+
        map
    }};
}
