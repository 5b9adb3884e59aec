//! Switchport (L2) settings on IOS.

use crate::engine::{ResourceModule, State};
use crate::error::{Error, Result};
use crate::facts;
use crate::model::{L2InterfaceRecord, TrunkConfig};
use crate::render::{collapse_scopes, ScopedBlock};
use crate::utils::{
    find_by_key, list_diff_have_only, list_diff_want_only, normalize_interface,
    vlan_range_to_string,
};

use super::{interface_scope, INTERFACE_SECTION};

const ACCESS_VLAN: &str = "switchport access vlan";
const TRUNK_ENCAPSULATION: &str = "switchport trunk encapsulation";
const TRUNK_NATIVE_VLAN: &str = "switchport trunk native vlan";
const TRUNK_ALLOWED_VLAN: &str = "switchport trunk allowed vlan";
const TRUNK_PRUNING_VLAN: &str = "switchport trunk pruning vlan";

/// Reconciles access/trunk switchport configuration on IOS interfaces.
pub struct IosL2Interfaces;

impl ResourceModule for IosL2Interfaces {
    type Record = L2InterfaceRecord;

    fn name(&self) -> &'static str {
        "ios_l2_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some(INTERFACE_SECTION)
    }

    fn parse(&self, running_config: &str) -> Vec<L2InterfaceRecord> {
        facts::ios::parse_l2_interfaces(running_config)
    }

    fn validate(&self, want: &[L2InterfaceRecord]) -> Result<()> {
        for w in want {
            w.validate()?;
        }
        Ok(())
    }

    fn commands(
        &self,
        state: State,
        want: &[L2InterfaceRecord],
        have: &[L2InterfaceRecord],
    ) -> Result<Vec<String>> {
        let mut commands = Vec::new();
        match state {
            State::Merged => {
                for w in want {
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    commands.extend(set_config(&name, w, &h, true)?.into_commands());
                }
            }
            State::Replaced => {
                for w in want {
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    commands.extend(converge(&name, w, &h)?);
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
                    commands.extend(converge(&name, w, &h)?);
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

fn have_or_default(name: &str, have: &[L2InterfaceRecord]) -> L2InterfaceRecord {
    find_by_key(name, have, |r| &r.name)
        .cloned()
        .unwrap_or_else(|| L2InterfaceRecord::named(name))
}

fn converge(name: &str, w: &L2InterfaceRecord, h: &L2InterfaceRecord) -> Result<Vec<String>> {
    let mut commands = clear_config(name, w, h).into_commands();
    let mode_dropped = commands.iter().any(|cmd| cmd == "no switchport mode");
    let mut set = set_config(name, w, h, false)?;
    // the clear phase drops the operational mode; the wanted group has to
    // re-assert it even when none of its own attributes changed
    if mode_dropped {
        if w.trunk.is_some() {
            set.set("switchport mode trunk");
        } else if w.access.is_some() {
            set.set("switchport mode access");
        }
    }
    commands.extend(set.into_commands());
    Ok(collapse_scopes(commands, "interface "))
}

/// Clear attributes set on the device that `want` leaves unset. Selecting
/// one switchport group clears the other's attributes automatically.
fn clear_config(name: &str, w: &L2InterfaceRecord, h: &L2InterfaceRecord) -> ScopedBlock {
    let mut block = ScopedBlock::new(interface_scope(name));
    let mut cleared = false;

    let want_access_vlan = w.access.as_ref().and_then(|a| a.vlan);
    let have_access_vlan = h.access.as_ref().and_then(|a| a.vlan);
    if have_access_vlan.is_some() && want_access_vlan.is_none() {
        block.clear(ACCESS_VLAN);
        cleared = true;
    }

    let want_trunk = w.trunk.clone().unwrap_or_default();
    if let Some(have_trunk) = &h.trunk {
        if have_trunk.encapsulation.is_some() && want_trunk.encapsulation.is_none() {
            block.clear(TRUNK_ENCAPSULATION);
            cleared = true;
        }
        if have_trunk.native_vlan.is_some() && want_trunk.native_vlan.is_none() {
            block.clear(TRUNK_NATIVE_VLAN);
            cleared = true;
        }
        if !have_trunk.allowed_vlans.is_empty() && want_trunk.allowed_vlans.is_empty() {
            block.clear(TRUNK_ALLOWED_VLAN);
            cleared = true;
        }
        if !have_trunk.pruning_vlans.is_empty() && want_trunk.pruning_vlans.is_empty() {
            block.clear(TRUNK_PRUNING_VLAN);
            cleared = true;
        }
    }

    // dropping attrs of either group invalidates the operational mode
    if cleared {
        block.clear("switchport mode");
    }
    block
}

fn set_config(
    name: &str,
    w: &L2InterfaceRecord,
    h: &L2InterfaceRecord,
    incremental: bool,
) -> Result<ScopedBlock> {
    let mut block = ScopedBlock::new(interface_scope(name));

    if let Some(access) = &w.access {
        let have_vlan = h.access.as_ref().and_then(|a| a.vlan);
        if let Some(vlan) = access.vlan {
            if Some(vlan) != have_vlan {
                block.set("switchport mode access");
                block.set(format!("{ACCESS_VLAN} {vlan}"));
            }
        }
    }

    if let Some(trunk) = &w.trunk {
        let have_trunk = h.trunk.clone().unwrap_or_default();
        if trunk.encapsulation.is_none() && have_trunk.encapsulation.is_none() {
            return Err(Error::validation(format!(
                "interface {name}: trunk mode cannot be configured without an encapsulation"
            )));
        }

        let mut trunk_cmds: Vec<String> = Vec::new();
        if let Some(encapsulation) = &trunk.encapsulation {
            if trunk.encapsulation != have_trunk.encapsulation {
                trunk_cmds.push(format!("{TRUNK_ENCAPSULATION} {encapsulation}"));
            }
        }
        if let Some(native_vlan) = trunk.native_vlan {
            if trunk.native_vlan != have_trunk.native_vlan {
                trunk_cmds.push(format!("{TRUNK_NATIVE_VLAN} {native_vlan}"));
            }
        }
        trunk_cmds.extend(vlan_list_edit(
            TRUNK_ALLOWED_VLAN,
            &trunk.allowed_vlans,
            &have_trunk.allowed_vlans,
            incremental,
        ));
        trunk_cmds.extend(vlan_list_edit(
            TRUNK_PRUNING_VLAN,
            &trunk.pruning_vlans,
            &have_trunk.pruning_vlans,
            incremental,
        ));

        if !trunk_cmds.is_empty() {
            // encapsulation is a prerequisite of trunk mode
            let mut iter = trunk_cmds.into_iter();
            if let Some(first) = iter.next() {
                if first.starts_with(TRUNK_ENCAPSULATION) {
                    block.set(first);
                    block.set("switchport mode trunk");
                } else {
                    block.set("switchport mode trunk");
                    block.set(first);
                }
            }
            for cmd in iter {
                block.set(cmd);
            }
        }
    }

    Ok(block)
}

/// Render a VLAN list edit: incremental `add` commands when the platform is
/// merging onto an existing list, a full replacement list otherwise.
fn vlan_list_edit(
    base: &str,
    want: &[u16],
    have: &[u16],
    incremental: bool,
) -> Vec<String> {
    if want.is_empty() {
        return Vec::new();
    }
    if incremental && !have.is_empty() {
        let added: Vec<u16> = list_diff_want_only(want, have).into_iter().copied().collect();
        if added.is_empty() {
            return Vec::new();
        }
        return vec![format!("{base} add {}", vlan_range_to_string(&added))];
    }
    let added = list_diff_want_only(want, have);
    let removed = list_diff_have_only(want, have);
    if added.is_empty() && removed.is_empty() {
        return Vec::new();
    }
    vec![format!("{base} {}", vlan_range_to_string(want))]
}

fn purge(h: &L2InterfaceRecord) -> Vec<String> {
    clear_config(&h.name, &L2InterfaceRecord::named(&h.name), h).into_commands()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessConfig;
    use pretty_assertions::assert_eq;

    fn trunk(encapsulation: &str, allowed: &[u16]) -> TrunkConfig {
        TrunkConfig {
            encapsulation: Some(encapsulation.to_string()),
            allowed_vlans: allowed.to_vec(),
            ..TrunkConfig::default()
        }
    }

    #[test]
    fn test_merged_sets_access_mode_with_vlan() {
        let want = vec![L2InterfaceRecord {
            access: Some(AccessConfig { vlan: Some(20) }),
            ..L2InterfaceRecord::named("gi0/1")
        }];
        let commands = IosL2Interfaces.commands(State::Merged, &want, &[]).unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "switchport mode access",
                "switchport access vlan 20",
            ]
        );
    }

    #[test]
    fn test_merged_adds_vlans_incrementally() {
        let want = vec![L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 20, 30])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let have = vec![L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 20])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL2Interfaces
            .commands(State::Merged, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "switchport mode trunk",
                "switchport trunk allowed vlan add 30",
            ]
        );
    }

    #[test]
    fn test_replaced_renders_full_vlan_list() {
        let want = vec![L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 30])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let have = vec![L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 20])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL2Interfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "switchport mode trunk",
                "switchport trunk allowed vlan 10,30",
            ]
        );
    }

    #[test]
    fn test_access_want_clears_have_trunk() {
        let want = vec![L2InterfaceRecord {
            access: Some(AccessConfig { vlan: Some(20) }),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let have = vec![L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 20])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL2Interfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "no switchport trunk encapsulation",
                "no switchport trunk allowed vlan",
                "no switchport mode",
                "switchport mode access",
                "switchport access vlan 20",
            ]
        );
    }

    #[test]
    fn test_replaced_reasserts_trunk_mode_when_only_list_cleared() {
        let want = vec![L2InterfaceRecord {
            trunk: Some(TrunkConfig {
                encapsulation: Some("dot1q".to_string()),
                native_vlan: Some(10),
                ..TrunkConfig::default()
            }),
            ..L2InterfaceRecord::named("GigabitEthernet0/2")
        }];
        let have = vec![L2InterfaceRecord {
            trunk: Some(TrunkConfig {
                encapsulation: Some("dot1q".to_string()),
                native_vlan: Some(10),
                allowed_vlans: vec![10],
                ..TrunkConfig::default()
            }),
            ..L2InterfaceRecord::named("GigabitEthernet0/2")
        }];
        let commands = IosL2Interfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/2",
                "no switchport trunk allowed vlan",
                "no switchport mode",
                "switchport mode trunk",
            ]
        );
    }

    #[test]
    fn test_replaced_reasserts_access_mode_when_stale_trunk_cleared() {
        let want = vec![L2InterfaceRecord {
            access: Some(AccessConfig { vlan: Some(20) }),
            ..L2InterfaceRecord::named("GigabitEthernet0/2")
        }];
        let have = vec![L2InterfaceRecord {
            access: Some(AccessConfig { vlan: Some(20) }),
            trunk: Some(TrunkConfig {
                native_vlan: Some(5),
                ..TrunkConfig::default()
            }),
            ..L2InterfaceRecord::named("GigabitEthernet0/2")
        }];
        let commands = IosL2Interfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/2",
                "no switchport trunk native vlan",
                "no switchport mode",
                "switchport mode access",
            ]
        );
    }

    #[test]
    fn test_trunk_without_encapsulation_fails() {
        let want = vec![L2InterfaceRecord {
            trunk: Some(TrunkConfig {
                allowed_vlans: vec![10],
                ..TrunkConfig::default()
            }),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let err = IosL2Interfaces
            .commands(State::Merged, &want, &[])
            .unwrap_err();
        assert!(err.to_string().contains("encapsulation"));
    }

    #[test]
    fn test_deleted_purges_switchport_config() {
        let have = vec![L2InterfaceRecord {
            access: Some(AccessConfig { vlan: Some(20) }),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        }];
        let commands = IosL2Interfaces.commands(State::Deleted, &[], &have).unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/1",
                "no switchport access vlan",
                "no switchport mode",
            ]
        );
    }

    #[test]
    fn test_noop_on_equal_state() {
        let record = L2InterfaceRecord {
            trunk: Some(trunk("dot1q", &[10, 20])),
            ..L2InterfaceRecord::named("GigabitEthernet0/1")
        };
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let commands = IosL2Interfaces
                .commands(state, &[record.clone()], &[record.clone()])
                .unwrap();
            assert!(commands.is_empty(), "{state} should be a no-op");
        }
    }
}
