use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{ContextError, Result};

static INSTANCE: OnceLock<ContextStore> = OnceLock::new();

/// Read side of the store. Hand this to consumers that must never write.
pub trait ContextRead {
    fn has(&self, key: &str) -> bool;

    /// Option-returning lookup for call sites that check presence anyway.
    fn find(&self, key: &str) -> Option<Value>;

    /// Value bound to `key`, or `UndefinedContextKey`. This is the indexed read
    /// (`ctx["key"]` in map-like APIs).
    fn get(&self, key: &str) -> Result<Value> {
        self.find(key)
            .ok_or_else(|| ContextError::UndefinedContextKey(key.to_string()))
    }
}

/// Single-key write side. Every call fails with `ContextImmutable`; contexts
/// only enter the store through [`ContextStore::set_context`].
pub trait ContextWrite {
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn unset(&self, key: &str) -> Result<()>;
}

/// Process-wide, append-only mapping from context names to values.
///
/// Obtain it with [`ContextStore::instance`]. Keys are admitted first-write-wins
/// and, once present, are never rebound or removed.
///
/// There is no public constructor; a second store cannot be built:
///
/// ```compile_fail
/// use context_aware::ContextStore;
///
/// let rogue = ContextStore::default();
/// ```
#[derive(Debug)]
pub struct ContextStore {
    values: RwLock<HashMap<String, Value>>,
}

impl ContextStore {
    pub(crate) fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// The one store of this process, created on first call.
    pub fn instance() -> &'static ContextStore {
        INSTANCE.get_or_init(|| {
            debug!("context store created");
            ContextStore::new()
        })
    }

    /// Merge `values` into the store. Keys already present keep their value.
    pub fn set_context<I, K>(&self, values: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.admit(values);
    }

    /// Like [`set_context`](Self::set_context), returning how many keys were new.
    pub fn admit<I, K>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return 0;
        }

        let mut map = self.write_guard();
        let mut admitted = 0;
        for (key, value) in values {
            match map.entry(key.into()) {
                Entry::Occupied(slot) => {
                    debug!(key = %slot.key(), "context already set, keeping first value");
                }
                Entry::Vacant(slot) => {
                    debug!(key = %slot.key(), "context admitted");
                    slot.insert(value);
                    admitted += 1;
                }
            }
        }
        admitted
    }

    /// Parse a JSON object document and admit its members.
    pub fn set_context_json(&self, json: &str) -> Result<usize> {
        let doc: Value =
            serde_json::from_str(json).map_err(|e| ContextError::Parse(e.to_string()))?;
        match doc {
            Value::Object(members) => Ok(self.admit(members)),
            other => Err(ContextError::InvalidContext(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Sorted key listing.
    pub fn keys(&self) -> Vec<String> {
        self.read_guard().keys().cloned().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    /// Detached copy of the current mapping as a JSON object.
    pub fn snapshot(&self) -> Value {
        let map = self.read_guard();
        Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }

    // The map is append-only, so a writer that panicked mid-insert still
    // leaves a consistent map behind.
    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.values.read().unwrap_or_else(|poisoned| {
            warn!("context lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.values.write().unwrap_or_else(|poisoned| {
            warn!("context lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl ContextRead for ContextStore {
    fn has(&self, key: &str) -> bool {
        self.read_guard().contains_key(key)
    }

    fn find(&self, key: &str) -> Option<Value> {
        self.read_guard().get(key).cloned()
    }
}

impl ContextWrite for ContextStore {
    fn set(&self, key: &str, _value: Value) -> Result<()> {
        warn!(key, "rejected write to context");
        Err(ContextError::ContextImmutable(key.to_string()))
    }

    fn unset(&self, key: &str) -> Result<()> {
        warn!(key, "rejected removal of context");
        Err(ContextError::ContextImmutable(key.to_string()))
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
