use serde_json::Value;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid fixture name '{0}'")]
    InvalidName(String),
    #[error("failed to read fixture '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fixture '{name}' is not valid JSON")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only source of fixture documents, addressed by relative name
/// (e.g. `appliance/get_all_appliances_lite.json`).
#[async_trait::async_trait]
pub trait FixtureStore: Send + Sync {
    /// Load and parse a fixture. `Ok(None)` means the document does not exist.
    async fn load(&self, name: &str) -> Result<Option<Value>, FixtureError>;

    async fn exists(&self, name: &str) -> Result<bool, FixtureError> {
        Ok(self.load(name).await?.is_some())
    }
}

/// Fixture names must stay inside the fixture root: relative, no `..`, no empty components.
pub fn validate_fixture_name(name: &str) -> Result<(), FixtureError> {
    let invalid = || FixtureError::InvalidName(name.to_string());

    if name.is_empty() || name.starts_with('/') || name.split('/').any(str::is_empty) {
        return Err(invalid());
    }

    let all_normal = Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !all_normal {
        return Err(invalid());
    }

    Ok(())
}

pub(crate) fn parse_fixture(name: &str, bytes: &[u8]) -> Result<Value, FixtureError> {
    serde_json::from_slice(bytes).map_err(|source| FixtureError::Parse {
        name: name.to_string(),
        source,
    })
}
