use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::store::traits::{parse_fixture, validate_fixture_name, FixtureError, FixtureStore};

/// Fixtures laid out as JSON files under a root directory, one subdirectory per topic.
#[derive(Debug, Clone)]
pub struct FsFixtureStore {
    root: PathBuf,
}

impl FsFixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FixtureStore for FsFixtureStore {
    async fn load(&self, name: &str) -> Result<Option<Value>, FixtureError> {
        validate_fixture_name(name)?;

        let path = self.root.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FixtureError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        parse_fixture(name, &bytes).map(Some)
    }
}
