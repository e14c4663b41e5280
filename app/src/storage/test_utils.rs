//! Test support: a gateway wrapper that injects write failures for chosen
//! path prefixes, so failure semantics (partial batch commits, rejected
//! transitions) can be exercised deterministically.

use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::gateway::{MemoryStore, StoreError, StoreGateway};

pub struct FailingStore {
    inner: MemoryStore,
    denied_prefixes: Mutex<Vec<String>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            denied_prefixes: Mutex::new(Vec::new()),
        }
    }

    /// Make every write under `prefix` fail with `StoreError::Unavailable`.
    pub fn deny_writes(&self, prefix: &str) {
        self.denied_prefixes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prefix.to_string());
    }

    /// Lift all injected failures.
    pub fn allow_all(&self) {
        self.denied_prefixes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn check_write(&self, path: &str) -> Result<(), StoreError> {
        let denied = self.denied_prefixes.lock().unwrap_or_else(|e| e.into_inner());
        if denied.iter().any(|p| path.starts_with(p.as_str())) {
            return Err(StoreError::Unavailable(format!(
                "injected write failure at '{path}'"
            )));
        }
        Ok(())
    }
}

impl StoreGateway for FailingStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(path)
    }

    fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check_write(path)?;
        self.inner.set(path, value)
    }

    fn update(&self, path: &str, partial: Map<String, Value>) -> Result<(), StoreError> {
        self.check_write(path)?;
        self.inner.update(path, partial)
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.check_write(path)?;
        self.inner.remove(path)
    }

    fn push(&self, path: &str) -> Result<String, StoreError> {
        self.inner.push(path)
    }
}
