//! Layer-3 addressing (IPv4/IPv6, DHCP, sub-interfaces).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// L3 addressing of a single interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct L3InterfaceRecord {
    /// Canonical, normalized interface identifier.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<Ipv4Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<Ipv6Address>,
    /// VLAN sub-interfaces (VyOS vifs); empty on platforms without them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vifs: Vec<L3Vif>,
}

impl L3InterfaceRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Enforce record-level invariants on a desired-state record.
    pub fn validate(&self) -> Result<()> {
        let mut primaries = 0;
        for addr in &self.ipv4 {
            addr.validate(&self.name)?;
            if !addr.secondary && !addr.dhcp {
                primaries += 1;
            }
        }
        if primaries > 1 {
            return Err(Error::validation(format!(
                "interface {}: at most one non-secondary IPv4 address is allowed",
                self.name
            )));
        }
        for addr in &self.ipv6 {
            addr.validate(&self.name)?;
        }
        for vif in &self.vifs {
            for addr in &vif.ipv4 {
                addr.validate(&self.name)?;
            }
            for addr in &vif.ipv6 {
                addr.validate(&self.name)?;
            }
        }
        Ok(())
    }
}

/// One IPv4 address assignment.
///
/// `address` (CIDR form) and `dhcp` are mutually exclusive; secondary
/// addresses are additive alongside the single primary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ipv4Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub secondary: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dhcp: bool,
    /// DHCP client-id interface number (IOS `ip address dhcp client-id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_client: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_hostname: Option<String>,
}

impl Ipv4Address {
    /// Static address in CIDR form.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.dhcp && self.address.is_some() {
            return Err(Error::validation(format!(
                "interface {name}: ipv4 address and dhcp are mutually exclusive"
            )));
        }
        if let Some(address) = &self.address {
            let Some((_, mask)) = address.split_once('/') else {
                return Err(Error::validation(format!(
                    "interface {name}: ipv4 address format is <address>/<masklen>, got '{address}'"
                )));
            };
            match mask.parse::<u8>() {
                Ok(len) if len <= 32 => {}
                _ => {
                    return Err(Error::validation(format!(
                        "interface {name}: invalid ipv4 mask '{mask}', expected 0-32"
                    )))
                }
            }
        }
        Ok(())
    }
}

/// One IPv6 address assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ipv6Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dhcp: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub autoconfig: bool,
}

impl Ipv6Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if let Some(address) = &self.address {
            let Some((_, mask)) = address.split_once('/') else {
                return Err(Error::validation(format!(
                    "interface {name}: ipv6 address format is <address>/<masklen>, got '{address}'"
                )));
            };
            match mask.parse::<u8>() {
                Ok(len) if len <= 128 => {}
                _ => {
                    return Err(Error::validation(format!(
                        "interface {name}: invalid ipv6 mask '{mask}', expected 0-128"
                    )))
                }
            }
        }
        Ok(())
    }
}

/// A VLAN sub-interface carrying its own address set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct L3Vif {
    pub vlan_id: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<Ipv4Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<Ipv6Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_primary_ipv4() {
        let record = L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("192.0.2.1/24"), Ipv4Address::new("198.51.100.1/24")],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        };
        assert!(record.validate().is_err());

        let record = L3InterfaceRecord {
            ipv4: vec![
                Ipv4Address::new("192.0.2.1/24"),
                Ipv4Address {
                    secondary: true,
                    ..Ipv4Address::new("198.51.100.1/24")
                },
            ],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_mask_validation() {
        let record = L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("192.0.2.1/33")],
            ..L3InterfaceRecord::named("eth0")
        };
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("invalid ipv4 mask"));

        let record = L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("192.0.2.1")],
            ..L3InterfaceRecord::named("eth0")
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_dhcp_and_address_exclusive() {
        let record = L3InterfaceRecord {
            ipv4: vec![Ipv4Address {
                dhcp: true,
                ..Ipv4Address::new("192.0.2.1/24")
            }],
            ..L3InterfaceRecord::named("eth0")
        };
        assert!(record.validate().is_err());
    }
}
