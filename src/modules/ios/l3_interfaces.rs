//! L3 addressing on IOS.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts::{self, ios::cidr_to_address_netmask};
use crate::model::{Ipv4Address, Ipv6Address, L3InterfaceRecord};
use crate::render::{collapse_scopes, ScopedBlock};
use crate::utils::{find_by_key, list_diff_have_only, list_diff_want_only, normalize_interface};

use super::{interface_scope, INTERFACE_SECTION};

/// Reconciles IPv4/IPv6 addressing on IOS interfaces, including the DHCP
/// client-id/hostname forms and secondary addresses.
pub struct IosL3Interfaces;

impl ResourceModule for IosL3Interfaces {
    type Record = L3InterfaceRecord;

    fn name(&self) -> &'static str {
        "ios_l3_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some(INTERFACE_SECTION)
    }

    fn parse(&self, running_config: &str) -> Vec<L3InterfaceRecord> {
        facts::ios::parse_l3_interfaces(running_config)
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
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    commands.extend(set_config(&name, w, &h, false, false).into_commands());
                }
            }
            State::Replaced => {
                for w in want {
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    commands.extend(converge(&name, w, &h));
                }
            }
            State::Overridden => {
                for h in have {
                    let listed = want
                        .iter()
                        .any(|w| normalize_interface(&w.name) == h.name);
                    if !listed {
                        commands.extend(purge(h));
                    }
                }
                for w in want {
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    commands.extend(converge(&name, w, &h));
                }
            }
            State::Deleted => {
                if want.is_empty() {
                    for h in have {
                        commands.extend(purge(h));
                    }
                } else {
                    for w in want {
                        let name = normalize_interface(&w.name);
                        if let Some(h) = find_by_key(&name, have, |r| &r.name) {
                            commands.extend(purge(h));
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

fn family_differs<T: PartialEq>(want: &[T], have: &[T]) -> bool {
    !list_diff_want_only(want, have).is_empty() || !list_diff_have_only(want, have).is_empty()
}

/// Full convergence of one record: a family whose address set differs is
/// cleared wholesale and re-populated, since IOS keeps stale secondaries
/// around otherwise.
fn converge(name: &str, w: &L3InterfaceRecord, h: &L3InterfaceRecord) -> Vec<String> {
    let clear_v4 = !h.ipv4.is_empty() && family_differs(&w.ipv4, &h.ipv4);
    let clear_v6 = !h.ipv6.is_empty() && family_differs(&w.ipv6, &h.ipv6);

    let mut block = ScopedBlock::new(interface_scope(name));
    if clear_v4 {
        block.clear("ip address");
    }
    if clear_v6 {
        block.clear("ipv6 address");
    }
    let mut commands = block.into_commands();
    commands.extend(set_config(name, w, h, clear_v4, clear_v6).into_commands());
    collapse_scopes(commands, "interface ")
}

/// Set wanted addresses absent from the device. `force_*` re-emits a whole
/// family whose clear preceded it in the same batch.
fn set_config(
    name: &str,
    w: &L3InterfaceRecord,
    h: &L3InterfaceRecord,
    force_v4: bool,
    force_v6: bool,
) -> ScopedBlock {
    let mut block = ScopedBlock::new(interface_scope(name));
    for addr in &w.ipv4 {
        if force_v4 || !h.ipv4.contains(addr) {
            if let Some(cmd) = ipv4_command(addr) {
                block.set(cmd);
            }
        }
    }
    for addr in &w.ipv6 {
        if force_v6 || !h.ipv6.contains(addr) {
            if let Some(cmd) = ipv6_command(addr) {
                block.set(cmd);
            }
        }
    }
    block
}

fn ipv4_command(addr: &Ipv4Address) -> Option<String> {
    if addr.dhcp {
        let mut cmd = String::from("ip address dhcp");
        if let Some(client) = addr.dhcp_client {
            cmd.push_str(&format!(" client-id GigabitEthernet0/{client}"));
        }
        if let Some(hostname) = &addr.dhcp_hostname {
            cmd.push_str(&format!(" hostname {hostname}"));
        }
        return Some(cmd);
    }
    let text = cidr_to_address_netmask(addr.address.as_deref()?)?;
    if addr.secondary {
        Some(format!("ip address {text} secondary"))
    } else {
        Some(format!("ip address {text}"))
    }
}

fn ipv6_command(addr: &Ipv6Address) -> Option<String> {
    if addr.dhcp {
        Some("ipv6 address dhcp".to_string())
    } else if addr.autoconfig {
        Some("ipv6 address autoconfig".to_string())
    } else {
        addr.address
            .as_deref()
            .map(|address| format!("ipv6 address {address}"))
    }
}

fn purge(h: &L3InterfaceRecord) -> Vec<String> {
    let mut block = ScopedBlock::new(interface_scope(&h.name));
    if !h.ipv4.is_empty() {
        block.clear("ip address");
    }
    if !h.ipv6.is_empty() {
        block.clear("ipv6 address");
    }
    block.into_commands()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn have_gi1() -> L3InterfaceRecord {
        L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("192.0.2.1/24")],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        }
    }

    #[test]
    fn test_merged_adds_secondary_address() {
        let want = vec![L3InterfaceRecord {
            ipv4: vec![
                Ipv4Address::new("192.0.2.1/24"),
                Ipv4Address {
                    secondary: true,
                    ..Ipv4Address::new("198.51.100.1/24")
                },
            ],
            ..L3InterfaceRecord::named("gi0/1")
        }];
        let commands = IosL3Interfaces
            .commands(State::Merged, &want, &[have_gi1()])
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "ip address 198.51.100.1 255.255.255.0 secondary",
            ]
        );
    }

    #[test]
    fn test_merged_renders_dhcp_forms() {
        let want = vec![L3InterfaceRecord {
            ipv4: vec![Ipv4Address {
                dhcp: true,
                dhcp_client: Some(2),
                dhcp_hostname: Some("branch1".to_string()),
                ..Ipv4Address::default()
            }],
            ..L3InterfaceRecord::named("GigabitEthernet0/2")
        }];
        let commands = IosL3Interfaces.commands(State::Merged, &want, &[]).unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/2",
                "ip address dhcp client-id GigabitEthernet0/2 hostname branch1",
            ]
        );
    }

    #[test]
    fn test_replaced_clears_and_repopulates_family() {
        let want = vec![L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("203.0.113.1/24")],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let have = vec![L3InterfaceRecord {
            ipv4: vec![
                Ipv4Address::new("192.0.2.1/24"),
                Ipv4Address {
                    secondary: true,
                    ..Ipv4Address::new("198.51.100.1/24")
                },
            ],
            ipv6: vec![Ipv6Address::new("2001:db8::1/64")],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL3Interfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "no ip address",
                "no ipv6 address",
                "ip address 203.0.113.1 255.255.255.0",
            ]
        );
    }

    #[test]
    fn test_replaced_noop_on_equal_state() {
        let commands = IosL3Interfaces
            .commands(State::Replaced, &[have_gi1()], &[have_gi1()])
            .unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_deleted_purges_both_families() {
        let have = vec![L3InterfaceRecord {
            ipv4: vec![Ipv4Address::new("192.0.2.1/24")],
            ipv6: vec![Ipv6Address::new("2001:db8::1/64")],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL3Interfaces.commands(State::Deleted, &[], &have).unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "no ip address",
                "no ipv6 address",
            ]
        );
    }

    #[test]
    fn test_validation_rejects_two_primaries() {
        let want = vec![L3InterfaceRecord {
            ipv4: vec![
                Ipv4Address::new("192.0.2.1/24"),
                Ipv4Address::new("198.51.100.1/24"),
            ],
            ..L3InterfaceRecord::named("GigabitEthernet0/1")
        }];
        assert!(IosL3Interfaces.validate(&want).is_err());
    }
}
