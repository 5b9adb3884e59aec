//! VyOS facts parsers.
//!
//! VyOS exposes its configuration as flat `set <path> '<value>'` lines, so
//! every parser here works the same way: collect the lines naming a given
//! interface (or the lldp service), then pull attribute values out of those
//! lines. `vif`-scoped lines are split off and parsed into sub-interface
//! records keyed by vlan id.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    ArpMonitor, InterfaceRecord, Ipv4Address, Ipv6Address, L3InterfaceRecord, L3Vif, LagMember,
    LagRecord, LldpRecord, VifRecord,
};

static INTERFACE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^set interfaces (?:ethernet|bonding|vti|loopback|vxlan) (\S+)")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

static L3_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^set interfaces (?:ethernet|bonding) (\S+)")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

static LAG_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^set interfaces bonding (\S+)")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

static BOND_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^set interfaces ethernet (\S+) bond-group '?([^'\s]+)'?")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

static VIF_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" vif (\d+) ").unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// Interface names in first-occurrence order.
fn interface_names<'a>(config: &'a str, re: &Regex) -> IndexSet<&'a str> {
    re.captures_iter(config)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// All config lines mentioning the given interface.
fn lines_for<'a>(config: &'a str, name: &str) -> Vec<&'a str> {
    let marker = format!(" {name} ");
    config
        .lines()
        .filter(|line| line.contains(&marker))
        .collect()
}

/// Value following ` <key> ` on the first line that carries it, with the
/// surrounding quotes stripped.
fn parse_flat_arg(lines: &[&str], key: &str) -> Option<String> {
    let marker = format!(" {key} ");
    for line in lines {
        if let Some(pos) = line.find(&marker) {
            let value = line[pos + marker.len()..].trim().trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn has_disable(lines: &[&str]) -> bool {
    lines.iter().any(|line| line.trim_end().ends_with(" disable"))
}

fn split_vif_lines<'a>(lines: Vec<&'a str>) -> (Vec<&'a str>, Vec<&'a str>) {
    lines.into_iter().partition(|line| line.contains(" vif "))
}

/// Parse basic interface settings (plus vifs) from flat config lines.
pub fn parse_interfaces(config: &str) -> Vec<InterfaceRecord> {
    let mut records = Vec::new();
    for name in interface_names(config, &INTERFACE_NAME_RE) {
        let (vif_lines, base) = split_vif_lines(lines_for(config, name));
        records.push(InterfaceRecord {
            name: name.to_string(),
            description: parse_flat_arg(&base, "description"),
            enabled: has_disable(&base).then_some(false),
            speed: parse_flat_arg(&base, "speed"),
            duplex: parse_flat_arg(&base, "duplex"),
            mtu: parse_flat_arg(&base, "mtu").and_then(|v| v.parse().ok()),
            mode: None,
            vifs: parse_vifs(&vif_lines),
        });
    }
    records
}

fn parse_vifs(vif_lines: &[&str]) -> Vec<VifRecord> {
    let mut vifs = Vec::new();
    for vlan_id in vif_ids(vif_lines) {
        let lines = vif_scoped(vif_lines, vlan_id);
        vifs.push(VifRecord {
            vlan_id,
            description: parse_flat_arg(&lines, "description"),
            mtu: parse_flat_arg(&lines, "mtu").and_then(|v| v.parse().ok()),
            enabled: has_disable(&lines).then_some(false),
        });
    }
    vifs
}

fn vif_ids(vif_lines: &[&str]) -> IndexSet<u16> {
    vif_lines
        .iter()
        .filter_map(|line| VIF_ID_RE.captures(line))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

fn vif_scoped<'a>(vif_lines: &[&'a str], vlan_id: u16) -> Vec<&'a str> {
    let marker = format!(" vif {vlan_id} ");
    vif_lines
        .iter()
        .filter(|line| line.contains(&marker))
        .copied()
        .collect()
}

/// Parse L3 addressing (plus vifs) from flat config lines.
pub fn parse_l3_interfaces(config: &str) -> Vec<L3InterfaceRecord> {
    let mut records = Vec::new();
    for name in interface_names(config, &L3_NAME_RE) {
        let (vif_lines, base) = split_vif_lines(lines_for(config, name));
        let (ipv4, ipv6) = parse_addresses(&base);
        let vifs = vif_ids(&vif_lines)
            .into_iter()
            .map(|vlan_id| {
                let (ipv4, ipv6) = parse_addresses(&vif_scoped(&vif_lines, vlan_id));
                L3Vif {
                    vlan_id,
                    ipv4,
                    ipv6,
                }
            })
            .filter(|vif| !vif.ipv4.is_empty() || !vif.ipv6.is_empty())
            .collect();
        records.push(L3InterfaceRecord {
            name: name.to_string(),
            ipv4,
            ipv6,
            vifs,
        });
    }
    records
}

/// Classify `address` values: both families live under the same key, with
/// `dhcp`/`dhcpv6` standing in for an address.
fn parse_addresses(lines: &[&str]) -> (Vec<Ipv4Address>, Vec<Ipv6Address>) {
    let mut ipv4 = Vec::new();
    let mut ipv6 = Vec::new();
    for &line in lines {
        let Some(value) = parse_flat_arg(&[line], "address") else {
            continue;
        };
        match value.as_str() {
            "dhcp" => ipv4.push(Ipv4Address {
                dhcp: true,
                ..Ipv4Address::default()
            }),
            "dhcpv6" => ipv6.push(Ipv6Address {
                dhcp: true,
                ..Ipv6Address::default()
            }),
            addr if addr.contains(':') => ipv6.push(Ipv6Address::new(addr)),
            addr => ipv4.push(Ipv4Address::new(addr)),
        }
    }
    (ipv4, ipv6)
}

/// Parse bonding groups from flat config lines.
///
/// Membership lives on the member's own config subtree (`set interfaces
/// ethernet ethN bond-group <lag>`), so members are collected from the whole
/// config rather than the group's lines.
pub fn parse_lag_interfaces(config: &str) -> Vec<LagRecord> {
    let mut records = Vec::new();
    for name in interface_names(config, &LAG_NAME_RE) {
        let lines = lines_for(config, name);
        let arp_lines: Vec<&str> = lines
            .iter()
            .filter(|line| line.contains(" arp-monitor "))
            .copied()
            .collect();
        records.push(LagRecord {
            name: name.to_string(),
            mode: parse_flat_arg(&lines, "mode"),
            members: parse_members(config, name),
            primary: parse_flat_arg(&lines, "primary"),
            hash_policy: parse_flat_arg(&lines, "hash-policy"),
            arp_monitor: parse_arp_monitor(&arp_lines),
        });
    }
    records
}

fn parse_members(config: &str, lag: &str) -> Vec<LagMember> {
    BOND_GROUP_RE
        .captures_iter(config)
        .filter(|caps| caps.get(2).map(|m| m.as_str()) == Some(lag))
        .filter_map(|caps| caps.get(1).map(|m| LagMember::new(m.as_str())))
        .collect()
}

fn parse_arp_monitor(arp_lines: &[&str]) -> Option<ArpMonitor> {
    if arp_lines.is_empty() {
        return None;
    }
    let targets = arp_lines
        .iter()
        .filter_map(|&line| parse_flat_arg(&[line], "arp-monitor target"))
        .collect();
    Some(ArpMonitor {
        interval: parse_flat_arg(arp_lines, "arp-monitor interval").and_then(|v| v.parse().ok()),
        targets,
    })
}

/// Parse global LLDP service settings. Returns no record when the service is
/// absent from the config.
pub fn parse_lldp(config: &str) -> Option<LldpRecord> {
    let lines: Vec<&str> = config
        .lines()
        .filter(|line| line.trim_start().starts_with("set service lldp"))
        .collect();
    if lines.is_empty() {
        return None;
    }
    let legacy_protocols = lines
        .iter()
        .filter_map(|&line| parse_flat_arg(&[line], "legacy-protocols"))
        .collect();
    Some(LldpRecord {
        enable: true,
        address: parse_flat_arg(&lines, "management-address"),
        snmp: parse_flat_arg(&lines, "snmp"),
        legacy_protocols,
    })
}
