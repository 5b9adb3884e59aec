//! Layer-2 switchport settings (access/trunk).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Switchport configuration of a single interface.
///
/// `access` and `trunk` are mutually exclusive: a desired state populating
/// both fails validation, and the rendered configuration for one group always
/// clears the other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct L2InterfaceRecord {
    /// Canonical, normalized interface identifier.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trunk: Option<TrunkConfig>,
}

impl L2InterfaceRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Enforce record-level invariants on a desired-state record.
    pub fn validate(&self) -> Result<()> {
        if self.access.is_some() && self.trunk.is_some() {
            return Err(Error::validation(format!(
                "interface {}: access and trunk are mutually exclusive",
                self.name
            )));
        }
        if let Some(access) = &self.access {
            if let Some(vlan) = access.vlan {
                validate_vlan_id(vlan, &self.name)?;
            }
        }
        if let Some(trunk) = &self.trunk {
            for vlan in trunk
                .native_vlan
                .iter()
                .chain(&trunk.allowed_vlans)
                .chain(&trunk.pruning_vlans)
            {
                validate_vlan_id(*vlan, &self.name)?;
            }
        }
        Ok(())
    }
}

fn validate_vlan_id(vlan: u16, name: &str) -> Result<()> {
    if !(1..=4094).contains(&vlan) {
        return Err(Error::validation(format!(
            "interface {name}: vlan id {vlan} out of range 1-4094"
        )));
    }
    Ok(())
}

/// Access-mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

/// Trunk-mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrunkConfig {
    /// Trunk encapsulation (`dot1q`, `isl`, `negotiate`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encapsulation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,
    /// Expanded VLAN id list; rendered back as a compact range string.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_vlans: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pruning_vlans: Vec<u16>,
}
