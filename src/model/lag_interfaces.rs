//! Link-aggregation (bonding) groups.

use serde::{Deserialize, Serialize};

/// A bonding/LAG group.
///
/// A member interface belongs to at most one group at a time: assigning it to
/// a new group renders an explicit remove-then-add command pair against the
/// member's own scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LagRecord {
    /// Group name (e.g. `bond0`).
    pub name: String,
    /// Bonding mode (e.g. `802.3ad`, `active-backup`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<LagMember>,
    /// Primary member interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_monitor: Option<ArpMonitor>,
}

impl LagRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether `member` is enslaved to this group.
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m.member == member)
    }
}

/// One enslaved member interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LagMember {
    /// Member interface name (e.g. `eth1`).
    pub member: String,
}

impl LagMember {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
        }
    }
}

/// ARP link-monitoring settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArpMonitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
}
