use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

use crate::model::IdentifierClass;
use crate::store::{FixtureError, FixtureStore};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry fixture '{0}' is missing")]
    MissingFixture(String),
    #[error("registry fixture '{fixture}' is malformed: {reason}")]
    Malformed { fixture: String, reason: String },
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Where the known identifiers come from: one listing fixture, the array holding its
/// entries, and which entry field feeds which identifier class.
struct RegistrySource {
    fixture: &'static str,
    collection: &'static str,
    fields: &'static [(&'static str, IdentifierClass)],
}

const REGISTRY_SOURCES: &[RegistrySource] = &[
    RegistrySource {
        fixture: "appliance/get_all_appliances_lite.json",
        collection: "appliances",
        fields: &[
            ("uuid", IdentifierClass::ApplianceUuids),
            ("name", IdentifierClass::ApplianceNames),
            ("org", IdentifierClass::OrgNames),
        ],
    },
    RegistrySource {
        fixture: "device_group/device_group_fetch_all.json",
        collection: "deviceGroups",
        fields: &[("name", IdentifierClass::DeviceGroupNames)],
    },
    RegistrySource {
        fixture: "workflow/template_fetch_all.json",
        collection: "templates",
        fields: &[("templateName", IdentifierClass::TemplateNames)],
    },
];

/// Known identifier values per class. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    known: HashMap<IdentifierClass, HashSet<String>>,
}

impl IdRegistry {
    /// Populate the registry from the listing fixtures.
    ///
    /// A missing or malformed listing is an error; entries with absent or empty fields are skipped.
    pub async fn build<S: FixtureStore + ?Sized>(store: &S) -> Result<Self, RegistryError> {
        let mut registry = Self::default();

        for source in REGISTRY_SOURCES {
            let document = store
                .load(source.fixture)
                .await?
                .ok_or_else(|| RegistryError::MissingFixture(source.fixture.to_string()))?;

            registry.ingest(source, &document)?;
        }

        Ok(registry)
    }

    pub fn from_entries<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (IdentifierClass, V)>,
        V: Into<String>,
    {
        let mut registry = Self::default();
        for (class, value) in entries {
            registry.insert(class, value.into());
        }
        registry
    }

    fn ingest(&mut self, source: &RegistrySource, document: &Value) -> Result<(), RegistryError> {
        let malformed = |reason: &str| RegistryError::Malformed {
            fixture: source.fixture.to_string(),
            reason: reason.to_string(),
        };

        let object = document
            .as_object()
            .ok_or_else(|| malformed("top level is not an object"))?;

        let items = match object.get(source.collection) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(malformed(&format!(
                    "'{}' is not an array",
                    source.collection
                )))
            }
        };

        for item in items {
            for (field, class) in source.fields {
                match item.get(*field).and_then(Value::as_str) {
                    Some(value) if !value.is_empty() => self.insert(*class, value.to_string()),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn insert(&mut self, class: IdentifierClass, value: String) {
        self.known.entry(class).or_default().insert(value);
    }

    /// Exact, case-sensitive membership test.
    pub fn is_valid(&self, class: IdentifierClass, value: &str) -> bool {
        self.known
            .get(&class)
            .is_some_and(|values| values.contains(value))
    }

    pub fn values(&self, class: IdentifierClass) -> impl Iterator<Item = &str> {
        self.known
            .get(&class)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn len(&self, class: IdentifierClass) -> usize {
        self.known.get(&class).map_or(0, HashSet::len)
    }

    /// Number of known identifiers per class, every class included.
    pub fn stats(&self) -> BTreeMap<IdentifierClass, usize> {
        IdentifierClass::ALL
            .into_iter()
            .map(|class| (class, self.len(class)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFixtureStore;
    use serde_json::json;

    fn listings() -> MemoryFixtureStore {
        MemoryFixtureStore::new()
            .with_document(
                "appliance/get_all_appliances_lite.json",
                json!({
                    "appliances": [
                        {"uuid": "dc-east-001", "name": "DC-East-Primary", "org": "Acme-Corp"},
                        {"uuid": "br-nyc-001", "name": "Branch-NYC-01", "org": "Acme-Retail"},
                        {"uuid": "", "name": "Orphan"},
                        {"name": null, "org": "Acme-Corp"},
                        "not-an-object"
                    ],
                    "totalCount": 5
                }),
            )
            .with_document(
                "device_group/device_group_fetch_all.json",
                json!({"deviceGroups": [{"name": "DC-Controllers"}, {"name": 7}]}),
            )
            .with_document(
                "workflow/template_fetch_all.json",
                json!({
                    "templates": [{"templateName": "Enterprise-Branch-Gold"}, {"name": "ignored"}]
                }),
            )
    }

    #[tokio::test]
    async fn test_build_from_listings() {
        let registry = IdRegistry::build(&listings()).await.unwrap();

        assert!(registry.is_valid(IdentifierClass::ApplianceUuids, "dc-east-001"));
        assert!(registry.is_valid(IdentifierClass::ApplianceUuids, "br-nyc-001"));
        assert!(registry.is_valid(IdentifierClass::ApplianceNames, "Orphan"));
        assert!(registry.is_valid(IdentifierClass::OrgNames, "Acme-Retail"));
        assert!(registry.is_valid(IdentifierClass::DeviceGroupNames, "DC-Controllers"));
        assert!(registry.is_valid(IdentifierClass::TemplateNames, "Enterprise-Branch-Gold"));

        let stats = registry.stats();
        assert_eq!(stats[&IdentifierClass::ApplianceUuids], 2);
        assert_eq!(stats[&IdentifierClass::ApplianceNames], 3);
        assert_eq!(stats[&IdentifierClass::OrgNames], 2);
        assert_eq!(stats[&IdentifierClass::DeviceGroupNames], 1);
        assert_eq!(stats[&IdentifierClass::TemplateNames], 1);
    }

    #[tokio::test]
    async fn test_empty_values_are_never_registered() {
        let registry = IdRegistry::build(&listings()).await.unwrap();
        assert!(!registry.is_valid(IdentifierClass::ApplianceUuids, ""));
        assert!(!registry.is_valid(IdentifierClass::TemplateNames, "ignored"));
    }

    #[tokio::test]
    async fn test_classes_are_disjoint_lookups() {
        let registry = IdRegistry::build(&listings()).await.unwrap();
        assert!(!registry.is_valid(IdentifierClass::ApplianceNames, "dc-east-001"));
        assert!(!registry.is_valid(IdentifierClass::ApplianceUuids, "DC-East-Primary"));
    }

    #[test]
    fn test_membership_is_exact() {
        let registry =
            IdRegistry::from_entries([(IdentifierClass::DeviceGroupNames, "DC-Controllers")]);
        assert!(registry.is_valid(IdentifierClass::DeviceGroupNames, "DC-Controllers"));
        assert!(!registry.is_valid(IdentifierClass::DeviceGroupNames, "dc-controllers"));
        assert!(!registry.is_valid(IdentifierClass::DeviceGroupNames, " DC-Controllers"));
        assert!(!registry.is_valid(IdentifierClass::DeviceGroupNames, "DC-Controllers "));
        assert!(!registry.is_valid(IdentifierClass::OrgNames, "DC-Controllers"));
    }

    #[tokio::test]
    async fn test_missing_listing_fails() {
        let store = MemoryFixtureStore::new().with_document(
            "appliance/get_all_appliances_lite.json",
            json!({"appliances": []}),
        );
        let err = IdRegistry::build(&store).await.unwrap_err();
        let expected = "device_group/device_group_fetch_all.json";
        assert!(matches!(err, RegistryError::MissingFixture(ref f) if f == expected));
    }

    #[tokio::test]
    async fn test_malformed_listing_fails() {
        let not_json = listings()
            .with_raw("workflow/template_fetch_all.json", "{\"templates\": [");
        assert!(matches!(
            IdRegistry::build(&not_json).await,
            Err(RegistryError::Fixture(FixtureError::Parse { .. }))
        ));

        let not_object = listings()
            .with_document("workflow/template_fetch_all.json", json!([1, 2]));
        assert!(matches!(
            IdRegistry::build(&not_object).await,
            Err(RegistryError::Malformed { .. })
        ));

        let not_array = listings().with_document(
            "device_group/device_group_fetch_all.json",
            json!({"deviceGroups": {"name": "DC-Controllers"}}),
        );
        assert!(matches!(
            IdRegistry::build(&not_array).await,
            Err(RegistryError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_absent_collection_is_empty() {
        let store = listings()
            .with_document("workflow/template_fetch_all.json", json!({"totalCount": 0}));
        let registry = IdRegistry::build(&store).await.unwrap();
        assert_eq!(registry.len(IdentifierClass::TemplateNames), 0);
        assert_eq!(registry.values(IdentifierClass::TemplateNames).count(), 0);
    }
}
