use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::store::traits::{parse_fixture, validate_fixture_name, FixtureError, FixtureStore};

/// Fixtures held in memory as raw text, parsed on every load like the filesystem store.
#[derive(Debug, Clone, Default)]
pub struct MemoryFixtureStore {
    documents: HashMap<String, String>,
}

impl MemoryFixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: &str, document: Value) -> Self {
        self.insert(name, document);
        self
    }

    /// Store text verbatim, including text that is not valid JSON.
    pub fn with_raw(mut self, name: &str, raw: &str) -> Self {
        self.documents.insert(name.to_string(), raw.to_string());
        self
    }

    pub fn insert(&mut self, name: &str, document: Value) {
        self.documents
            .insert(name.to_string(), document.to_string());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
    async fn load(&self, name: &str) -> Result<Option<Value>, FixtureError> {
        validate_fixture_name(name)?;

        match self.documents.get(name) {
            Some(raw) => parse_fixture(name, raw.as_bytes()).map(Some),
            None => Ok(None),
        }
    }
}
