use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of identifiers the mock director knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifierClass {
    ApplianceUuids,
    ApplianceNames,
    DeviceGroupNames,
    TemplateNames,
    OrgNames,
}

/// Placeholder name → identifier class. Names are matched case-sensitively;
/// anything not listed here is accepted without validation.
pub const PLACEHOLDER_CLASSES: &[(&str, IdentifierClass)] = &[
    ("Uuid", IdentifierClass::ApplianceUuids),
    ("applianceUUID", IdentifierClass::ApplianceUuids),
    ("id", IdentifierClass::ApplianceUuids),
    ("applianceName", IdentifierClass::ApplianceNames),
    ("deviceName", IdentifierClass::ApplianceNames),
    ("deviceGroupName", IdentifierClass::DeviceGroupNames),
    ("templateworkflowName", IdentifierClass::TemplateNames),
    ("templateName", IdentifierClass::TemplateNames),
    ("org", IdentifierClass::OrgNames),
];

impl IdentifierClass {
    pub const ALL: [IdentifierClass; 5] = [
        IdentifierClass::ApplianceUuids,
        IdentifierClass::ApplianceNames,
        IdentifierClass::DeviceGroupNames,
        IdentifierClass::TemplateNames,
        IdentifierClass::OrgNames,
    ];

    pub fn for_placeholder(name: &str) -> Option<Self> {
        PLACEHOLDER_CLASSES
            .iter()
            .find(|(placeholder, _)| *placeholder == name)
            .map(|(_, class)| *class)
    }

    /// Human readable entity label used in "not found" messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdentifierClass::ApplianceUuids => "Appliance with UUID",
            IdentifierClass::ApplianceNames => "Appliance/device with name",
            IdentifierClass::DeviceGroupNames => "Device group",
            IdentifierClass::TemplateNames => "Template",
            IdentifierClass::OrgNames => "Organization",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierClass::ApplianceUuids => "applianceUuids",
            IdentifierClass::ApplianceNames => "applianceNames",
            IdentifierClass::DeviceGroupNames => "deviceGroupNames",
            IdentifierClass::TemplateNames => "templateNames",
            IdentifierClass::OrgNames => "orgNames",
        }
    }
}

impl fmt::Display for IdentifierClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
