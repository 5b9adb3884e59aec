//! IOS facts parsers.
//!
//! Interface resources parse `show running-config | section ^interface`
//! output: the text splits into per-interface blocks, and each attribute is
//! pulled out of its block with a line-oriented extractor. VLANs parse the
//! `show vlan` table instead, since the VLAN database is not part of the
//! running-config section output.

use tracing::warn;

use crate::model::{
    AccessConfig, InterfaceMode, InterfaceRecord, Ipv4Address, Ipv6Address, L2InterfaceRecord,
    L3InterfaceRecord, TrunkConfig, VlanRecord, VlanState,
};
use crate::utils::{
    has_conf_line, ios_interface_kind, masklen_to_netmask, netmask_to_masklen,
    normalize_interface, parse_conf_arg, parse_vlan_range,
};

/// Split running-config text into `(normalized name, block)` pairs, one per
/// `interface <name>` block. Blocks whose interface kind is not recognized
/// (including any preamble before the first block) are dropped.
fn interface_blocks(running_config: &str) -> Vec<(String, &str)> {
    let mut blocks = Vec::new();
    for conf in running_config.split("interface ") {
        if conf.trim().is_empty() {
            continue;
        }
        let Some(intf) = conf.split_whitespace().next() else {
            continue;
        };
        if ios_interface_kind(intf).is_none() {
            warn!(interface = intf, "dropping unrecognized interface block");
            continue;
        }
        blocks.push((normalize_interface(intf), conf));
    }
    blocks
}

/// Parse basic interface settings from running-config section output.
pub fn parse_interfaces(running_config: &str) -> Vec<InterfaceRecord> {
    interface_blocks(running_config)
        .into_iter()
        .map(|(name, conf)| InterfaceRecord {
            name,
            description: parse_conf_arg(conf, "description"),
            // Absence of a `shutdown` line means the device default (up);
            // leave the attribute unset rather than inventing `true`.
            enabled: has_conf_line(conf, "shutdown").then_some(false),
            speed: parse_conf_arg(conf, "speed"),
            duplex: parse_conf_arg(conf, "duplex"),
            mtu: parse_conf_arg(conf, "mtu").and_then(|v| v.parse().ok()),
            mode: parse_mode(conf),
            vifs: Vec::new(),
        })
        .collect()
}

fn parse_mode(conf: &str) -> Option<InterfaceMode> {
    if has_conf_line(conf, "no switchport") {
        Some(InterfaceMode::Layer3)
    } else if has_conf_line(conf, "switchport") {
        Some(InterfaceMode::Layer2)
    } else {
        None
    }
}

/// Parse switchport (L2) settings from running-config section output.
pub fn parse_l2_interfaces(running_config: &str) -> Vec<L2InterfaceRecord> {
    interface_blocks(running_config)
        .into_iter()
        .map(|(name, conf)| {
            let access = parse_conf_arg(conf, "switchport access vlan")
                .and_then(|v| v.parse().ok())
                .map(|vlan| AccessConfig { vlan: Some(vlan) });

            let trunk = TrunkConfig {
                encapsulation: parse_conf_arg(conf, "switchport trunk encapsulation"),
                native_vlan: parse_conf_arg(conf, "switchport trunk native vlan")
                    .and_then(|v| v.parse().ok()),
                allowed_vlans: parse_conf_arg(conf, "switchport trunk allowed vlan")
                    .map(|v| parse_vlan_range(&v))
                    .unwrap_or_default(),
                pruning_vlans: parse_conf_arg(conf, "switchport trunk pruning vlan")
                    .map(|v| parse_vlan_range(&v))
                    .unwrap_or_default(),
            };
            let trunk = (trunk != TrunkConfig::default()).then_some(trunk);

            L2InterfaceRecord {
                name,
                access,
                trunk,
            }
        })
        .collect()
}

/// Parse L3 addressing from running-config section output.
pub fn parse_l3_interfaces(running_config: &str) -> Vec<L3InterfaceRecord> {
    interface_blocks(running_config)
        .into_iter()
        .map(|(name, conf)| {
            let mut ipv4 = Vec::new();
            let mut ipv6 = Vec::new();
            for line in conf.lines() {
                let line = line.trim();
                if let Some(rest) = line.strip_prefix("ip address ") {
                    if let Some(addr) = parse_ipv4_value(rest) {
                        ipv4.push(addr);
                    }
                } else if let Some(rest) = line.strip_prefix("ipv6 address ") {
                    ipv6.push(parse_ipv6_value(rest));
                }
            }
            L3InterfaceRecord {
                name,
                ipv4,
                ipv6,
                vifs: Vec::new(),
            }
        })
        .collect()
}

/// Parse the remainder of an `ip address ...` line.
///
/// Handles `A.B.C.D M.M.M.M [secondary]` and the
/// `dhcp [client-id <intf>] [hostname <name>]` family.
fn parse_ipv4_value(rest: &str) -> Option<Ipv4Address> {
    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?;

    if first == "dhcp" {
        let mut addr = Ipv4Address {
            dhcp: true,
            ..Ipv4Address::default()
        };
        let mut tokens = tokens.peekable();
        while let Some(token) = tokens.next() {
            match token {
                "client-id" => {
                    // The client-id is an interface reference; only the
                    // trailing unit number is tracked.
                    addr.dhcp_client = tokens
                        .next()
                        .and_then(|intf| intf.rsplit('/').next())
                        .and_then(|unit| unit.parse().ok());
                }
                "hostname" => {
                    addr.dhcp_hostname = tokens.next().map(str::to_string);
                }
                _ => {}
            }
        }
        return Some(addr);
    }

    let netmask = tokens.next()?;
    let masklen = netmask_to_masklen(netmask)?;
    Some(Ipv4Address {
        address: Some(format!("{first}/{masklen}")),
        secondary: tokens.any(|t| t == "secondary"),
        ..Ipv4Address::default()
    })
}

fn parse_ipv6_value(rest: &str) -> Ipv6Address {
    let value = rest.split_whitespace().next().unwrap_or(rest);
    match value {
        "dhcp" => Ipv6Address {
            dhcp: true,
            ..Ipv6Address::default()
        },
        "autoconfig" => Ipv6Address {
            autoconfig: true,
            ..Ipv6Address::default()
        },
        other => Ipv6Address::new(other),
    }
}

/// Render a CIDR address back to the `A.B.C.D M.M.M.M` form IOS expects.
pub fn cidr_to_address_netmask(cidr: &str) -> Option<String> {
    let (address, masklen) = cidr.split_once('/')?;
    let masklen: u8 = masklen.parse().ok()?;
    if masklen > 32 {
        return None;
    }
    Some(format!("{address} {}", masklen_to_netmask(masklen)))
}

/// Parse `show vlan` table output into VLAN database records.
///
/// The output has three sections: the name/status table, the type table
/// (which carries the MTU column), and the remote SPAN list. Rows are matched
/// across sections by VLAN id.
pub fn parse_vlans(show_vlan: &str) -> Vec<VlanRecord> {
    #[derive(PartialEq)]
    enum Section {
        Name,
        Kind,
        Remote,
        Other,
    }

    let mut records: Vec<VlanRecord> = Vec::new();
    let mut section = Section::Other;

    for line in show_vlan.lines() {
        if line.contains("Name") {
            section = Section::Name;
            continue;
        } else if line.contains("Type") {
            section = Section::Kind;
            continue;
        } else if line.contains("Remote") {
            section = Section::Remote;
            continue;
        }
        if line.trim().is_empty() || line.trim_start().starts_with('-') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // Continuation rows (wrapped port lists) do not start with an id.
        let Some(vlan_id) = tokens.first().and_then(|t| t.parse::<u16>().ok()) else {
            continue;
        };

        match section {
            Section::Name => {
                let mut record = VlanRecord::new(vlan_id);
                record.name = tokens.get(1).map(|t| t.to_string());
                if let Some(status) = tokens.get(2) {
                    // A `sus/lshut` style status means the vlan is shut down
                    // in addition to its base state.
                    if let Some((state, _)) = status.split_once('/') {
                        record.shutdown = Some(true);
                        record.state = state.parse::<VlanState>().ok();
                    } else {
                        record.state = status.parse::<VlanState>().ok();
                    }
                }
                records.push(record);
            }
            Section::Kind => {
                if let Some(record) = records.iter_mut().find(|r| r.vlan_id == vlan_id) {
                    record.mtu = tokens.get(3).and_then(|t| t.parse().ok());
                }
            }
            Section::Remote => {
                if let Some(record) = records.iter_mut().find(|r| r.vlan_id == vlan_id) {
                    record.remote_span = true;
                }
            }
            Section::Other => {}
        }
    }
    records
}
