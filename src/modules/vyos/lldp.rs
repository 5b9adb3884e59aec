//! Global LLDP service settings on VyOS.
//!
//! A single-record resource: the device carries at most one LLDP
//! configuration, so `want` and `have` hold zero or one record. The
//! management address maps to the `management-address` config key.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::LldpRecord;

use super::{del_attr, set_attr};

const LLDP: &str = "service lldp";

/// Reconciles the global LLDP service on VyOS.
pub struct VyosLldp;

impl ResourceModule for VyosLldp {
    type Record = LldpRecord;

    fn name(&self) -> &'static str {
        "vyos_lldp"
    }

    fn selector(&self) -> Option<&'static str> {
        Some("| grep lldp")
    }

    fn parse(&self, running_config: &str) -> Vec<LldpRecord> {
        facts::vyos::parse_lldp(running_config).into_iter().collect()
    }

    fn validate(&self, want: &[LldpRecord]) -> Result<()> {
        for w in want {
            w.validate()?;
        }
        Ok(())
    }

    fn commands(
        &self,
        state: State,
        want: &[LldpRecord],
        have: &[LldpRecord],
    ) -> Result<Vec<String>> {
        let want = want.first();
        let have = have.first();
        let commands = match state {
            State::Merged => match want {
                Some(w) => set_config(w, have),
                None => Vec::new(),
            },
            State::Replaced | State::Overridden => match want {
                Some(w) => {
                    let mut commands = clear_config(w, have);
                    commands.extend(set_config(w, have));
                    commands
                }
                None if state == State::Overridden => purge(have),
                None => Vec::new(),
            },
            State::Deleted => purge(have),
        };
        Ok(commands)
    }
}

fn set_config(w: &LldpRecord, h: Option<&LldpRecord>) -> Vec<String> {
    let mut commands = Vec::new();
    if !w.enable {
        if h.is_some() {
            commands.push(format!("delete {LLDP}"));
        }
        return commands;
    }
    if h.is_none() {
        commands.push(format!("set {LLDP}"));
    }
    let default = LldpRecord::default();
    let h = h.unwrap_or(&default);

    if let Some(address) = &w.address {
        if w.address != h.address {
            commands.push(set_attr(LLDP, "management-address", address));
        }
    }
    if let Some(snmp) = &w.snmp {
        // `disable` is a request to drop the integration, not a value
        if snmp == "disable" {
            if h.snmp.is_some() {
                commands.push(del_attr(LLDP, "snmp"));
            }
        } else if w.snmp != h.snmp {
            commands.push(format!("set {LLDP} snmp {snmp}"));
        }
    }
    for protocol in &w.legacy_protocols {
        if !h.legacy_protocols.contains(protocol) {
            commands.push(set_attr(LLDP, "legacy-protocols", protocol));
        }
    }
    commands
}

fn clear_config(w: &LldpRecord, h: Option<&LldpRecord>) -> Vec<String> {
    let Some(h) = h else {
        return Vec::new();
    };
    let mut commands = Vec::new();
    if h.address.is_some() && w.address.is_none() {
        commands.push(del_attr(LLDP, "management-address"));
    }
    if h.snmp.is_some() && w.snmp.is_none() {
        commands.push(del_attr(LLDP, "snmp"));
    }
    for protocol in &h.legacy_protocols {
        if !w.legacy_protocols.contains(protocol) {
            commands.push(format!("delete {LLDP} legacy-protocols '{protocol}'"));
        }
    }
    commands
}

/// The device default is no LLDP subtree at all.
fn purge(h: Option<&LldpRecord>) -> Vec<String> {
    match h {
        Some(_) => vec![format!("delete {LLDP}")],
        None => Vec::new(),
    }
}
