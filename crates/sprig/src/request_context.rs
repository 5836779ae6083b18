// File: src/request_context.rs
// Purpose: Per-request isolated state threaded through a task-local scope

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::sync::{Arc, Mutex};

tokio::task_local! {
    static CURRENT_CONTEXT: RequestContext;
}

/// A named piece of per-request state and the value it resets to.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEntry {
    pub state: JsonValue,
    pub initial: JsonValue,
}

/// Per-request state container.
///
/// Created once per inbound request and dropped at request end; concurrent
/// resolutions each get their own. Cloning is cheap (shared inner), so a
/// handle can travel into callbacks while `current_context()` keeps working
/// anywhere inside the scoped future. The only state shared across requests
/// is the immutable route table.
#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    store: Mutex<JsonValue>,
    states: Mutex<IndexMap<String, StateEntry>>,
    session_id: Option<String>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("session_id", &self.inner.session_id)
            .field("states", &self.state_names())
            .finish()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self::build(Some(session_id.into()))
    }

    fn build(session_id: Option<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                store: Mutex::new(JsonValue::Null),
                states: Mutex::new(IndexMap::new()),
                session_id,
            }),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.inner.session_id.as_deref()
    }

    /// Opaque request-scoped store.
    pub fn store(&self) -> JsonValue {
        self.inner.store.lock().expect("store lock poisoned").clone()
    }

    pub fn set_store(&self, value: JsonValue) {
        *self.inner.store.lock().expect("store lock poisoned") = value;
    }

    /// Registers a named state with its initial value. Registering the same
    /// name again resets it.
    pub fn register_state(&self, name: impl Into<String>, initial: JsonValue) {
        let mut states = self.inner.states.lock().expect("state lock poisoned");
        states.insert(
            name.into(),
            StateEntry {
                state: initial.clone(),
                initial,
            },
        );
    }

    pub fn state(&self, name: &str) -> Option<JsonValue> {
        let states = self.inner.states.lock().expect("state lock poisoned");
        states.get(name).map(|entry| entry.state.clone())
    }

    /// Updates a named state; an unregistered name is registered with the
    /// value as its initial.
    pub fn set_state(&self, name: impl Into<String>, value: JsonValue) {
        let name = name.into();
        let mut states = self.inner.states.lock().expect("state lock poisoned");
        match states.get_mut(&name) {
            Some(entry) => entry.state = value,
            None => {
                states.insert(
                    name,
                    StateEntry {
                        state: value.clone(),
                        initial: value,
                    },
                );
            }
        }
    }

    /// Resets a named state back to its initial value.
    pub fn reset_state(&self, name: &str) {
        let mut states = self.inner.states.lock().expect("state lock poisoned");
        if let Some(entry) = states.get_mut(name) {
            entry.state = entry.initial.clone();
        }
    }

    /// Registered state names in registration order.
    pub fn state_names(&self) -> Vec<String> {
        let states = self.inner.states.lock().expect("state lock poisoned");
        states.keys().cloned().collect()
    }
}

/// Runs a future with `context` installed as the current request context.
///
/// Everything awaited inside `future`, however deeply nested, can retrieve
/// the context with [`current_context`]. Scopes do not leak: once the future
/// completes the context is gone.
pub async fn run_with_context<F>(context: RequestContext, future: F) -> F::Output
where
    F: Future,
{
    CURRENT_CONTEXT.scope(context, future).await
}

/// The current request's context, or `None` outside a request scope.
///
/// `None` is the documented fallback for non-request execution (tests,
/// client-side use, background tasks); callers must handle it rather than
/// assume a request is in flight.
pub fn current_context() -> Option<RequestContext> {
    CURRENT_CONTEXT.try_with(|context| context.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_context_outside_scope() {
        assert!(current_context().is_none());
    }

    #[tokio::test]
    async fn test_context_visible_inside_scope() {
        let context = RequestContext::with_session("abc123");
        run_with_context(context, async {
            let current = current_context().expect("context should be in scope");
            assert_eq!(current.session_id(), Some("abc123"));
        })
        .await;
        assert!(current_context().is_none());
    }

    #[tokio::test]
    async fn test_state_registry_order_and_reset() {
        let context = RequestContext::new();
        context.register_state("count", json!(0));
        context.register_state("filter", json!("all"));

        context.set_state("count", json!(5));
        assert_eq!(context.state("count"), Some(json!(5)));

        context.reset_state("count");
        assert_eq!(context.state("count"), Some(json!(0)));

        assert_eq!(context.state_names(), vec!["count", "filter"]);
    }

    #[tokio::test]
    async fn test_concurrent_scopes_are_isolated() {
        let a = RequestContext::with_session("a");
        let b = RequestContext::with_session("b");

        let task_a = tokio::spawn(run_with_context(a, async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            current_context().unwrap().session_id().map(str::to_string)
        }));
        let task_b = tokio::spawn(run_with_context(b, async {
            current_context().unwrap().session_id().map(str::to_string)
        }));

        assert_eq!(task_a.await.unwrap(), Some("a".to_string()));
        assert_eq!(task_b.await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let context = RequestContext::new();
        assert_eq!(context.store(), JsonValue::Null);
        context.set_store(json!({"user": "jo"}));
        assert_eq!(context.store(), json!({"user": "jo"}));
    }
}
