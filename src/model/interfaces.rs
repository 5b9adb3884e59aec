//! Basic interface settings (description, enablement, speed/duplex/MTU).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Administrative settings of a single interface.
///
/// `enabled: None` means the attribute was not specified; interfaces default
/// to enabled on the supported platforms, so absence reads as "up".
/// A speed or duplex of `"auto"` is the platform's "not explicitly
/// configured" sentinel and is never treated as a diffable value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Canonical, normalized interface identifier.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Switched versus routed operation, on platforms that distinguish them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<InterfaceMode>,
    /// VLAN sub-interfaces (VyOS vifs); empty on platforms without them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vifs: Vec<VifRecord>,
}

impl InterfaceRecord {
    /// Create an empty record for the given interface.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Effective enablement: absent means enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Whether an interface operates as a switched (L2) or routed (L3) port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    Layer2,
    Layer3,
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceMode::Layer2 => write!(f, "layer2"),
            InterfaceMode::Layer3 => write!(f, "layer3"),
        }
    }
}

impl FromStr for InterfaceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "layer2" | "l2" => Ok(InterfaceMode::Layer2),
            "layer3" | "l3" => Ok(InterfaceMode::Layer3),
            other => Err(Error::validation(format!(
                "unknown interface mode '{other}', expected layer2 or layer3"
            ))),
        }
    }
}

/// A VLAN sub-interface nested under a physical interface.
///
/// Identity is `(parent name, vlan_id)`; the attribute subset is restricted
/// to what the platform allows on a vif.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VifRecord {
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl VifRecord {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_enabled_reads_as_up() {
        let intf = InterfaceRecord::named("eth0");
        assert!(intf.is_enabled());
        let down = InterfaceRecord {
            enabled: Some(false),
            ..InterfaceRecord::named("eth0")
        };
        assert!(!down.is_enabled());
    }
}
