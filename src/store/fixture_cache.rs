use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::store::traits::{FixtureError, FixtureStore};

/// Memoizes successfully loaded fixtures in front of another store.
///
/// Fixtures are immutable for the lifetime of the process, so entries never expire.
/// Missing documents and load errors are not cached.
#[derive(Debug)]
pub struct CachedFixtureStore<S> {
    inner: S,
    /// Parsed documents keyed by fixture name
    entries: RwLock<HashMap<String, Arc<Value>>>,
}

impl<S> CachedFixtureStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Drop every cached document
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl<S: FixtureStore> FixtureStore for CachedFixtureStore<S> {
    async fn load(&self, name: &str) -> Result<Option<Value>, FixtureError> {
        let cached = self.entries.read().get(name).cloned();
        if let Some(doc) = cached {
            return Ok(Some(Value::clone(&doc)));
        }

        let Some(doc) = self.inner.load(name).await? else {
            return Ok(None);
        };

        // two concurrent misses may both load; the documents are identical so either insert wins
        self.entries
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(doc.clone()));

        Ok(Some(doc))
    }
}
