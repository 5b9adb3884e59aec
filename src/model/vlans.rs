//! VLAN database entries.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One VLAN database entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VlanRecord {
    /// VLAN id, 1-4094.
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<VlanState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remote_span: bool,
}

impl VlanRecord {
    pub fn new(vlan_id: u16) -> Self {
        Self {
            vlan_id,
            ..Self::default()
        }
    }

    /// Enforce record-level invariants on a desired-state record.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4094).contains(&self.vlan_id) {
            return Err(Error::validation(format!(
                "vlan_id {} out of range 1-4094",
                self.vlan_id
            )));
        }
        Ok(())
    }
}

/// Operational state of a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VlanState {
    Active,
    Suspend,
}

impl fmt::Display for VlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanState::Active => write!(f, "active"),
            VlanState::Suspend => write!(f, "suspend"),
        }
    }
}

impl FromStr for VlanState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "active" | "act" => Ok(VlanState::Active),
            "suspend" | "suspended" | "sus" => Ok(VlanState::Suspend),
            _ => Err(Error::validation(format!(
                "Unknown vlan state: {s}. Valid options: active, suspend"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_id_bounds() {
        assert!(VlanRecord::new(0).validate().is_err());
        assert!(VlanRecord::new(1).validate().is_ok());
        assert!(VlanRecord::new(4094).validate().is_ok());
        assert!(VlanRecord::new(4095).validate().is_err());
    }

    #[test]
    fn test_state_round_trip() {
        assert_eq!("act".parse::<VlanState>().unwrap(), VlanState::Active);
        assert_eq!("suspended".parse::<VlanState>().unwrap(), VlanState::Suspend);
        assert_eq!(VlanState::Suspend.to_string(), "suspend");
        assert!("bogus".parse::<VlanState>().is_err());
    }
}
