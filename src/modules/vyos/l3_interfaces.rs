//! L3 addressing on VyOS, including vif sub-interfaces.
//!
//! Both address families live under the same `address` node; `dhcp` and
//! `dhcpv6` stand in for an address. Individual addresses delete by value,
//! a purge deletes the whole node.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::{Ipv4Address, Ipv6Address, L3InterfaceRecord};
use crate::utils::find_by_key;

use super::{del_attr, interface_path, set_attr};

/// Reconciles IPv4/IPv6 addressing on VyOS interfaces.
pub struct VyosL3Interfaces;

impl ResourceModule for VyosL3Interfaces {
    type Record = L3InterfaceRecord;

    fn name(&self) -> &'static str {
        "vyos_l3_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some("| grep interfaces")
    }

    fn parse(&self, running_config: &str) -> Vec<L3InterfaceRecord> {
        facts::vyos::parse_l3_interfaces(running_config)
    }

    fn validate(&self, want: &[L3InterfaceRecord]) -> Result<()> {
        for w in want {
            w.validate()?;
        }
        Ok(())
    }

    fn commands(
        &self,
        state: State,
        want: &[L3InterfaceRecord],
        have: &[L3InterfaceRecord],
    ) -> Result<Vec<String>> {
        let mut commands = Vec::new();
        match state {
            State::Merged => {
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(set_config(w, &h)?);
                }
            }
            State::Replaced => {
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(clear_config(w, &h)?);
                    commands.extend(set_config(w, &h)?);
                }
            }
            State::Overridden => {
                for h in have {
                    if find_by_key(&h.name, want, |r| &r.name).is_none() {
                        commands.extend(purge(h)?);
                    }
                }
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(clear_config(w, &h)?);
                    commands.extend(set_config(w, &h)?);
                }
            }
            State::Deleted => {
                if want.is_empty() {
                    for h in have {
                        commands.extend(purge(h)?);
                    }
                } else {
                    for w in want {
                        if let Some(h) = find_by_key(&w.name, have, |r| &r.name) {
                            commands.extend(purge(h)?);
                        }
                    }
                }
            }
        }
        Ok(commands)
    }
}

fn have_or_default(name: &str, have: &[L3InterfaceRecord]) -> L3InterfaceRecord {
    find_by_key(name, have, |r| &r.name)
        .cloned()
        .unwrap_or_else(|| L3InterfaceRecord::named(name))
}

fn ipv4_value(addr: &Ipv4Address) -> Option<String> {
    if addr.dhcp {
        Some("dhcp".to_string())
    } else {
        addr.address.clone()
    }
}

fn ipv6_value(addr: &Ipv6Address) -> Option<String> {
    if addr.dhcp {
        Some("dhcpv6".to_string())
    } else {
        addr.address.clone()
    }
}

fn set_config(w: &L3InterfaceRecord, h: &L3InterfaceRecord) -> Result<Vec<String>> {
    let base = interface_path(&w.name)?;
    let mut commands = Vec::new();

    set_addresses(&base, &w.ipv4, &h.ipv4, &w.ipv6, &h.ipv6, &mut commands);
    for wv in &w.vifs {
        let path = format!("{base} vif {}", wv.vlan_id);
        let hv = h.vifs.iter().find(|v| v.vlan_id == wv.vlan_id);
        let have_v4: &[Ipv4Address] = hv.map(|v| v.ipv4.as_slice()).unwrap_or_default();
        let have_v6: &[Ipv6Address] = hv.map(|v| v.ipv6.as_slice()).unwrap_or_default();
        set_addresses(&path, &wv.ipv4, have_v4, &wv.ipv6, have_v6, &mut commands);
    }
    Ok(commands)
}

fn set_addresses(
    path: &str,
    want_v4: &[Ipv4Address],
    have_v4: &[Ipv4Address],
    want_v6: &[Ipv6Address],
    have_v6: &[Ipv6Address],
    commands: &mut Vec<String>,
) {
    for addr in want_v4 {
        if !have_v4.contains(addr) {
            if let Some(value) = ipv4_value(addr) {
                commands.push(set_attr(path, "address", value));
            }
        }
    }
    for addr in want_v6 {
        if !have_v6.contains(addr) {
            if let Some(value) = ipv6_value(addr) {
                commands.push(set_attr(path, "address", value));
            }
        }
    }
}

/// Delete device addresses `want` no longer lists, by value. A `have` vif
/// with no `want` counterpart loses its whole address node.
fn clear_config(w: &L3InterfaceRecord, h: &L3InterfaceRecord) -> Result<Vec<String>> {
    let base = interface_path(&h.name)?;
    let mut commands = Vec::new();

    clear_addresses(&base, &w.ipv4, &h.ipv4, &w.ipv6, &h.ipv6, &mut commands);
    for hv in &h.vifs {
        let path = format!("{base} vif {}", hv.vlan_id);
        match w.vifs.iter().find(|v| v.vlan_id == hv.vlan_id) {
            Some(wv) => {
                clear_addresses(&path, &wv.ipv4, &hv.ipv4, &wv.ipv6, &hv.ipv6, &mut commands)
            }
            None => commands.push(del_attr(&path, "address")),
        }
    }
    Ok(commands)
}

fn clear_addresses(
    path: &str,
    want_v4: &[Ipv4Address],
    have_v4: &[Ipv4Address],
    want_v6: &[Ipv6Address],
    have_v6: &[Ipv6Address],
    commands: &mut Vec<String>,
) {
    for addr in have_v4 {
        if !want_v4.contains(addr) {
            if let Some(value) = ipv4_value(addr) {
                commands.push(format!("delete {path} address '{value}'"));
            }
        }
    }
    for addr in have_v6 {
        if !want_v6.contains(addr) {
            if let Some(value) = ipv6_value(addr) {
                commands.push(format!("delete {path} address '{value}'"));
            }
        }
    }
}

fn purge(h: &L3InterfaceRecord) -> Result<Vec<String>> {
    let base = interface_path(&h.name)?;
    let mut commands = Vec::new();
    if !h.ipv4.is_empty() || !h.ipv6.is_empty() {
        commands.push(del_attr(&base, "address"));
    }
    for hv in &h.vifs {
        if !hv.ipv4.is_empty() || !hv.ipv6.is_empty() {
            commands.push(del_attr(&format!("{base} vif {}", hv.vlan_id), "address"));
        }
    }
    Ok(commands)
}
