//! LLDP service globals.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Legacy discovery protocols LLDP can additionally speak.
pub const LEGACY_PROTOCOLS: &[&str] = &["cdp", "edp", "fdp", "sonmp"];

/// Global LLDP service settings (one record per device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldpRecord {
    /// Whether the LLDP service is enabled.
    pub enable: bool,
    /// Management address advertised by LLDP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// SNMP integration (`enable`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_protocols: Vec<String>,
}

impl Default for LldpRecord {
    fn default() -> Self {
        Self {
            enable: true,
            address: None,
            snmp: None,
            legacy_protocols: Vec::new(),
        }
    }
}

impl LldpRecord {
    /// Enforce record-level invariants on a desired-state record.
    pub fn validate(&self) -> Result<()> {
        for protocol in &self.legacy_protocols {
            if !LEGACY_PROTOCOLS.contains(&protocol.as_str()) {
                return Err(Error::validation(format!(
                    "unknown legacy protocol '{protocol}'. Valid options: cdp, edp, fdp, sonmp"
                )));
            }
        }
        Ok(())
    }
}
