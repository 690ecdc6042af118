use itertools::Itertools;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{PathParams, Pattern, PatternError};

/// Endpoint pattern → fixture document, relative to the fixture root.
#[rustfmt::skip]
pub const BUILTIN_ENDPOINTS: &[(&str, &str)] = &[
    // appliance
    ("/nextgen/appliance/status", "appliance/get_all_appliance_status.json"),
    ("/nextgen/appliance/status/{id}", "appliance/get_single_appliance_status.json"),
    ("/nextgen/appliance/template_listing/{deviceName}", "appliance/get_device_template_listing.json"),
    ("/vnms/dashboard/appliance/location", "appliance/get_appliance_locations.json"),
    ("/vnms/appliance/{applianceName}/routing-instances", "appliance/get_routing_instance_information.json"),
    ("/vnms/appliance/appliance", "appliance/get_all_appliances_by_type_and_tags.json"),
    ("/vnms/appliance/appliance/lite", "appliance/get_all_appliances_lite.json"),
    ("/vnms/appliance/appliance/liteView", "appliance/get_all_appliances_liteview.json"),
    ("/vnms/appliance/applianceByName", "appliance/search_appliance_by_name.json"),
    ("/vnms/appliance/export", "appliance/export_appliance_configuration.json"),
    ("/vnms/appliance/summary", "appliance/get_appliances_summary.json"),
    ("/vnms/dashboard/appliance/{Uuid}", "appliance/get_appliance_details_by_uuid.json"),
    ("/vnms/dashboard/appliance/{Uuid}/hardware", "appliance/get_appliance_hardware.json"),
    ("/vnms/dashboard/appliance/{applianceName}/bandwidthservers", "appliance/get_bw_measurement.json"),
    ("/vnms/dashboard/appliance/{applianceName}/capabilities", "appliance/get_appliance_capabilities.json"),
    ("/vnms/dashboard/appliance/{applianceUUID}/syncStatus", "appliance/get_appliance_sync_status.json"),
    ("/vnms/dashboard/applianceServices/{applianceName}", "appliance/get_appliance_services.json"),
    ("/vnms/dashboard/applianceStatus/{applianceUUID}", "appliance/get_appliance_status.json"),
    ("/vnms/dashboard/applianceStatus/{applianceUUID}/brief", "appliance/get_appliance_status_brief.json"),
    ("/vnms/cloud/systems/getAllApplianceNames", "appliance/get_all_appliance_names.json"),
    ("/vnms/cloud/systems/getAllAppliancesBasicDetails", "appliance/get_all_appliances_basic_details.json"),
    ("/vnms/dashboard/applianceviolations/{applianceName}", "appliance/get_appliance_violations.json"),
    // health / dashboard
    ("/vnms/dashboard/appliance/{applianceName}/live", "health/get_appliance_live_status.json"),
    ("/vnms/dashboard/appliance/next_page_data", "health/get_next_page_data.json"),
    ("/vnms/dashboard/enableMonitoring", "health/get_enable_monitoring.json"),
    ("/vnms/dashboard/getMonitorPullEnabled/{deviceName}", "health/get_device_status_pulling_enabled.json"),
    ("/vnms/dashboard/health/ike", "health/get_health_ike.json"),
    ("/vnms/dashboard/health/interface", "health/get_health_interface.json"),
    ("/vnms/dashboard/health/path", "health/get_health_path.json"),
    ("/vnms/dashboard/lte/list", "health/get_devices_in_lte.json"),
    ("/vnms/dashboard/navTree", "health/get_nav_tree_node.json"),
    ("/vnms/dashboard/status/headEnds", "health/get_head_end_status.json"),
    ("/vnms/dashboard/vdStatus", "health/get_vd_status.json"),
    ("/vnms/dashboard/vdStatus/haDetails", "health/get_vd_ha_details.json"),
    ("/vnms/dashboard/vdStatus/packageInfo", "health/get_vd_package_info.json"),
    ("/vnms/dashboard/vdStatus/sysDetails", "health/get_sys_details.json"),
    ("/vnms/dashboard/vdStatus/sysUptime", "health/get_sys_uptime.json"),
    // workflow / template
    ("/vnms/alltypes/workflow/templates/template/{templateworkflowName}", "workflow/get_template_workflow.json"),
    ("/vnms/sdwan/workflow/devices", "workflow/device_workflow_fetch_all.json"),
    ("/vnms/sdwan/workflow/devices/device/{deviceName}", "workflow/get_specific_device_workflow.json"),
    ("/vnms/sdwan/workflow/binddata/devices/header/template/{templateName}", "workflow/get_template_bind_data_header_and_count.json"),
    ("/vnms/sdwan/workflow/templates", "workflow/template_fetch_all.json"),
    ("/vnms/sdwan/workflow/templates/template/{templateworkflowName}", "workflow/get_specific_template_workflow.json"),
    ("/nextgen/device/{deviceName}", "workflow/show_templates_associated_to_device.json"),
    // device group
    ("/nextgen/deviceGroup", "device_group/device_group_fetch_all.json"),
    ("/nextgen/deviceGroup/{deviceGroupName}", "device_group/get_specific_device_group.json"),
    ("/nextgen/deviceGroup/modelNumbers", "device_group/get_all_model_numbers.json"),
    // alarm / fault
    ("/vnms/fault/alarms/page", "alarm/filter_paginate_alarm.json"),
    ("/vnms/fault/alarm/handling", "alarm/get_alarm_handling.json"),
    ("/vnms/fault/alarms/summary/{org}", "alarm/get_alarm_summary_per_org.json"),
    ("/vnms/fault/alarms/summary", "alarm/get_alarm_summary.json"),
    ("/vnms/fault/types", "alarm/get_alarm_types.json"),
    ("/vnms/fault/alarms", "alarm/get_all_filtered_alarms.json"),
    ("/vnms/fault/analytics/alarms/summary", "alarm/get_analytics_alarm_summary.json"),
    ("/vnms/fault/analytics/alarms", "alarm/get_analytics_alarms.json"),
    ("/vnms/fault/appliance/alarm_model", "alarm/get_appliance_alarm_model.json"),
    ("/vnms/fault/appliance/types", "alarm/get_appliance_alarm_types.json"),
    ("/vnms/fault/alarms/summary/device/{deviceName}", "alarm/get_device_alarm_summary.json"),
    ("/vnms/fault/director/alarms/summary", "alarm/get_director_alarm_summary.json"),
    ("/vnms/fault/director/alarms", "alarm/get_director_alarms.json"),
    ("/vnms/fault/director/fail-over-alarms", "alarm/get_director_fail_over_alarms.json"),
    ("/vnms/fault/director/ha-alarms", "alarm/get_director_ha_alarms.json"),
    ("/vnms/fault/director/pop-up-summary", "alarm/get_imp_alarm_summary.json"),
    ("/vnms/fault/director/pop-up", "alarm/get_imp_alarms.json"),
    ("/vnms/fault/alarm/status", "alarm/get_status_change.json"),
    // audit
    ("/vnms/audit/logs", "audit/get_audit_logs.json"),
    // assets
    ("/vnms/assets/asset", "assets/get_all_assets.json"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },
    #[error("pattern '{0}' is registered more than once")]
    DuplicatePattern(String),
    #[error("pattern '{0}' has no fixture")]
    MissingFixture(String),
    #[error("patterns '{first}' and '{second}' can match the same path with different bindings")]
    Ambiguous { first: String, second: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub pattern: Pattern,
    pub fixture: String,
}

/// A catalog entry together with the parameters a concrete path bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub params: PathParams,
}

/// Immutable set of endpoint patterns, validated and ranked once at construction.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    /// Entries in declaration order
    entries: Vec<CatalogEntry>,
    by_pattern: HashMap<String, usize>,
    /// Indices into `entries`, most specific first
    ranked: Vec<usize>,
}

impl PatternCatalog {
    /// Build a catalog, rejecting malformed, duplicate and ambiguous patterns.
    pub fn new<I, P, F>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (P, F)>,
        P: AsRef<str>,
        F: Into<String>,
    {
        let mut parsed: Vec<CatalogEntry> = Vec::new();
        let mut by_pattern = HashMap::new();

        for (raw, fixture) in entries {
            let raw = raw.as_ref();
            let pattern = Pattern::parse(raw).map_err(|source| CatalogError::InvalidPattern {
                pattern: raw.to_string(),
                source,
            })?;

            let fixture = fixture.into();
            if fixture.trim().is_empty() {
                return Err(CatalogError::MissingFixture(raw.to_string()));
            }

            if by_pattern.insert(raw.to_string(), parsed.len()).is_some() {
                return Err(CatalogError::DuplicatePattern(raw.to_string()));
            }
            parsed.push(CatalogEntry { pattern, fixture });
        }

        let ambiguous = parsed
            .iter()
            .tuple_combinations()
            .find(|(a, b)| a.pattern.is_ambiguous_with(&b.pattern));
        if let Some((a, b)) = ambiguous {
            return Err(CatalogError::Ambiguous {
                first: a.pattern.to_string(),
                second: b.pattern.to_string(),
            });
        }

        // Deeper patterns first; among equal depth a refinement has more literals and wins.
        let ranked = (0..parsed.len())
            .sorted_by(|&a, &b| {
                let (a, b) = (&parsed[a].pattern, &parsed[b].pattern);
                b.segment_count()
                    .cmp(&a.segment_count())
                    .then_with(|| b.literal_count().cmp(&a.literal_count()))
                    .then_with(|| a.as_str().cmp(b.as_str()))
            })
            .collect();

        Ok(Self {
            entries: parsed,
            by_pattern,
            ranked,
        })
    }

    /// The catalog of mocked director endpoints.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(BUILTIN_ENDPOINTS.iter().copied())
    }

    /// Exact lookup of a path that is itself a placeholder-free pattern.
    pub fn lookup(&self, path: &str) -> Option<&CatalogEntry> {
        self.by_pattern
            .get(path)
            .map(|&index| &self.entries[index])
            .filter(|entry| entry.pattern.is_literal())
    }

    /// First pattern, in specificity order, that matches every segment of `path`.
    pub fn match_best(&self, path: &str) -> Option<&CatalogEntry> {
        self.ranked().find(|entry| entry.pattern.matches(path))
    }

    pub fn find(&self, path: &str) -> Option<&CatalogEntry> {
        self.lookup(path).or_else(|| self.match_best(path))
    }

    pub fn resolve_match(&self, path: &str) -> Option<ResolvedMatch<'_>> {
        let entry = self.find(path)?;
        Some(ResolvedMatch {
            entry,
            params: entry.pattern.extract_params(path),
        })
    }

    /// Entry registered under exactly this pattern text.
    pub fn get(&self, pattern: &str) -> Option<&CatalogEntry> {
        self.by_pattern.get(pattern).map(|&index| &self.entries[index])
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Entries in the order the matcher tries them.
    pub fn ranked(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.ranked.iter().map(|&index| &self.entries[index])
    }

    pub fn sample_patterns(&self, count: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(count)
            .map(|entry| entry.pattern.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdentifierClass;

    fn builtin() -> PatternCatalog {
        PatternCatalog::builtin().expect("builtin catalog is valid")
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 67);

        let per_topic = catalog
            .iter()
            .map(|entry| entry.fixture.split('/').next().unwrap_or_default())
            .counts();
        assert_eq!(per_topic["appliance"], 22);
        assert_eq!(per_topic["health"], 15);
        assert_eq!(per_topic["workflow"], 7);
        assert_eq!(per_topic["device_group"], 3);
        assert_eq!(per_topic["alarm"], 18);
        assert_eq!(per_topic["audit"], 1);
        assert_eq!(per_topic["assets"], 1);
    }

    #[test]
    fn test_builtin_placeholders_all_have_identifier_classes() {
        for entry in builtin().iter() {
            for name in entry.pattern.placeholder_names() {
                assert!(
                    IdentifierClass::for_placeholder(name).is_some(),
                    "placeholder '{}' in {} has no identifier class",
                    name,
                    entry.pattern
                );
            }
        }
    }

    #[test]
    fn test_lookup_only_hits_literal_patterns() {
        let catalog = builtin();
        assert_eq!(
            catalog.lookup("/vnms/audit/logs").map(|e| e.fixture.as_str()),
            Some("audit/get_audit_logs.json")
        );
        assert!(catalog.lookup("/vnms/dashboard/appliance/{Uuid}").is_none());
        assert!(catalog.lookup("/vnms/dashboard/appliance/dc-east-001").is_none());
        assert!(catalog.get("/vnms/dashboard/appliance/{Uuid}").is_some());
    }

    #[test]
    fn test_match_best_picks_matching_depth() {
        let catalog = builtin();
        let shallow = catalog
            .match_best("/vnms/dashboard/appliance/dc-east-001")
            .unwrap();
        assert_eq!(shallow.pattern.as_str(), "/vnms/dashboard/appliance/{Uuid}");

        let deep = catalog
            .match_best("/vnms/dashboard/appliance/dc-east-001/hardware")
            .unwrap();
        assert_eq!(
            deep.pattern.as_str(),
            "/vnms/dashboard/appliance/{Uuid}/hardware"
        );

        let by_name = catalog
            .match_best("/vnms/dashboard/appliance/DC-East-Primary/capabilities")
            .unwrap();
        assert_eq!(
            by_name.pattern.as_str(),
            "/vnms/dashboard/appliance/{applianceName}/capabilities"
        );
    }

    #[test]
    fn test_literal_refinement_wins_without_exact_lookup() {
        let catalog = builtin();
        for path in [
            "/vnms/dashboard/appliance/location",
            "/vnms/dashboard/appliance/next_page_data",
            "/nextgen/deviceGroup/modelNumbers",
        ] {
            let entry = catalog.match_best(path).unwrap();
            assert_eq!(entry.pattern.as_str(), path);
        }
    }

    #[test]
    fn test_ranked_order_is_by_descending_depth() {
        let catalog = builtin();
        let depths: Vec<usize> = catalog
            .ranked()
            .map(|e| e.pattern.segment_count())
            .collect();
        assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(catalog.ranked().count(), catalog.len());
    }

    #[test]
    fn test_deeper_pattern_is_tried_first() {
        let catalog = PatternCatalog::new([
            ("/api/{resource}", "shallow.json"),
            ("/api/{resource}/items/{item}", "deep.json"),
        ])
        .unwrap();

        assert_eq!(catalog.ranked().next().unwrap().fixture, "deep.json");
        assert_eq!(catalog.find("/api/x/items/y").unwrap().fixture, "deep.json");
        assert_eq!(catalog.find("/api/x").unwrap().fixture, "shallow.json");
        assert!(catalog.find("/api/x/items").is_none());
        assert!(catalog.find("/api").is_none());
    }

    #[test]
    fn test_unmatched_paths() {
        let catalog = builtin();
        assert!(catalog.find("/totally/unknown/path").is_none());
        assert!(catalog.find("").is_none());
        assert!(catalog.find("/").is_none());
        assert!(catalog.find("/vnms/audit/logs/").is_none());
        assert!(catalog.find("vnms/audit/logs").is_none());
    }

    #[test]
    fn test_resolve_match_extracts_params() {
        let catalog = builtin();
        let resolved = catalog
            .resolve_match("/vnms/fault/alarms/summary/device/Branch-NYC-01")
            .unwrap();
        assert_eq!(
            resolved.entry.fixture,
            "alarm/get_device_alarm_summary.json"
        );
        assert_eq!(resolved.params.get("deviceName"), Some("Branch-NYC-01"));

        let literal = catalog.resolve_match("/vnms/fault/alarms/summary").unwrap();
        assert!(literal.params.is_empty());
    }

    #[test]
    fn test_sample_patterns_follow_declaration_order() {
        let catalog = builtin();
        let sample = catalog.sample_patterns(5);
        let expected: Vec<&str> = BUILTIN_ENDPOINTS.iter().take(5).map(|(p, _)| *p).collect();
        assert_eq!(sample, expected);
        assert_eq!(catalog.sample_patterns(1000).len(), catalog.len());
    }

    #[test]
    fn test_rejects_ambiguous_patterns() {
        let err = PatternCatalog::new([("/api/{x}/b", "one.json"), ("/api/c/{y}", "two.json")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Ambiguous { .. }));

        let err = PatternCatalog::new([("/org/{org}", "one.json"), ("/org/{name}", "two.json")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Ambiguous { .. }));
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let err = PatternCatalog::new([("/a/{x}", "one.json"), ("/a/{x}", "two.json")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePattern(p) if p == "/a/{x}"));

        let err = PatternCatalog::new([("/a/b", "  ")]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFixture(_)));

        let err = PatternCatalog::new([("/a/pre{x}", "one.json")])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidPattern {
                source: PatternError::EmbeddedPlaceholder(_),
                ..
            }
        ));
    }
}
