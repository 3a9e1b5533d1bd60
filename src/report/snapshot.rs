//! Point-in-time copies of the form and the checklist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every string field of the service form. Empty strings are valid and
/// render as a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSnapshot {
    // identity
    pub company: String,
    pub site_location: String,
    pub contact_person: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    // equipment
    pub pump_model: String,
    pub serial_number: String,
    pub manufacture_year: String,
    pub operating_hours: String,
    pub last_service_date: String,
    pub installation_date: String,
    // conditions
    pub temperature: String,
    pub flow_rate: String,
    pub suction_pressure: String,
    pub discharge_pressure: String,
    pub total_head: String,
    pub pumped_medium: String,
    // narrative
    pub service_reason: String,
    /// Qualifies the safety-training checklist label.
    pub training_hours: String,
}

/// Which checklist group an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecklistGroup {
    Preparation,
    PreService,
}

/// Every known checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItem {
    // pump preparation
    PumpIsolated,
    Drained,
    Cooled,
    PowerDisconnected,
    Decontaminated,
    SpareParts,
    Documentation,
    LiftingPoints,
    FoundationAccess,
    // pre-service
    SafetyTraining,
    Ppe,
    LockoutTagout,
    WorkPermit,
    SiteAccess,
    ToolsReady,
}

const PREPARATION_ITEMS: [ChecklistItem; 9] = [
    ChecklistItem::PumpIsolated,
    ChecklistItem::Drained,
    ChecklistItem::Cooled,
    ChecklistItem::PowerDisconnected,
    ChecklistItem::Decontaminated,
    ChecklistItem::SpareParts,
    ChecklistItem::Documentation,
    ChecklistItem::LiftingPoints,
    ChecklistItem::FoundationAccess,
];

const PRE_SERVICE_ITEMS: [ChecklistItem; 6] = [
    ChecklistItem::SafetyTraining,
    ChecklistItem::Ppe,
    ChecklistItem::LockoutTagout,
    ChecklistItem::WorkPermit,
    ChecklistItem::SiteAccess,
    ChecklistItem::ToolsReady,
];

impl ChecklistItem {
    pub fn group(self) -> ChecklistGroup {
        if PRE_SERVICE_ITEMS.contains(&self) {
            ChecklistGroup::PreService
        } else {
            ChecklistGroup::Preparation
        }
    }
}

impl ChecklistGroup {
    pub fn items(self) -> &'static [ChecklistItem] {
        match self {
            ChecklistGroup::Preparation => &PREPARATION_ITEMS,
            ChecklistGroup::PreService => &PRE_SERVICE_ITEMS,
        }
    }
}

/// The active checklist item set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistVariant {
    /// Six pre-service items.
    #[default]
    PreServiceOnly,
    /// Nine pump-preparation items followed by the six pre-service items.
    Full,
}

impl ChecklistVariant {
    /// Groups in document order.
    pub fn groups(self) -> &'static [ChecklistGroup] {
        match self {
            ChecklistVariant::PreServiceOnly => &[ChecklistGroup::PreService],
            ChecklistVariant::Full => &[ChecklistGroup::Preparation, ChecklistGroup::PreService],
        }
    }

    pub fn items(self) -> Vec<ChecklistItem> {
        self.groups()
            .iter()
            .flat_map(|g| g.items().iter().copied())
            .collect()
    }
}

/// Checked state per item. Items that are absent count as unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistSnapshot {
    flags: BTreeMap<ChecklistItem, bool>,
}

impl ChecklistSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item of `variant` set to `checked`.
    pub fn uniform(variant: ChecklistVariant, checked: bool) -> Self {
        variant.items().into_iter().map(|item| (item, checked)).collect()
    }

    pub fn with(mut self, item: ChecklistItem, checked: bool) -> Self {
        self.flags.insert(item, checked);
        self
    }

    pub fn is_checked(&self, item: ChecklistItem) -> bool {
        self.flags.get(&item).copied().unwrap_or(false)
    }
}

impl FromIterator<(ChecklistItem, bool)> for ChecklistSnapshot {
    fn from_iter<I: IntoIterator<Item = (ChecklistItem, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}
