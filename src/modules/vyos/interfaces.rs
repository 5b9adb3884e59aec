//! Basic interface settings on VyOS, including vif sub-interfaces.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::{InterfaceRecord, VifRecord};
use crate::utils::find_by_key;

use super::{del_attr, interface_path, set_attr};

/// Reconciles description, enablement, speed/duplex/MTU and vifs on VyOS
/// interfaces.
pub struct VyosInterfaces;

impl ResourceModule for VyosInterfaces {
    type Record = InterfaceRecord;

    fn name(&self) -> &'static str {
        "vyos_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some("| grep interfaces")
    }

    fn parse(&self, running_config: &str) -> Vec<InterfaceRecord> {
        facts::vyos::parse_interfaces(running_config)
    }

    fn commands(
        &self,
        state: State,
        want: &[InterfaceRecord],
        have: &[InterfaceRecord],
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

fn have_or_default(name: &str, have: &[InterfaceRecord]) -> InterfaceRecord {
    find_by_key(name, have, |r| &r.name)
        .cloned()
        .unwrap_or_else(|| InterfaceRecord::named(name))
}

fn is_auto(value: &Option<String>) -> bool {
    value.as_deref() == Some("auto")
}

fn set_config(w: &InterfaceRecord, h: &InterfaceRecord) -> Result<Vec<String>> {
    let base = interface_path(&w.name)?;
    let mut commands = Vec::new();

    if let Some(value) = &w.description {
        if w.description != h.description {
            commands.push(set_attr(&base, "description", value));
        }
    }
    if let Some(value) = &w.speed {
        if value != "auto" && w.speed != h.speed {
            commands.push(set_attr(&base, "speed", value));
        }
    }
    if let Some(value) = &w.duplex {
        if value != "auto" && w.duplex != h.duplex {
            commands.push(set_attr(&base, "duplex", value));
        }
    }
    if let Some(value) = w.mtu {
        if w.mtu != h.mtu {
            commands.push(set_attr(&base, "mtu", value));
        }
    }
    match w.enabled {
        Some(false) if h.is_enabled() => commands.push(format!("set {base} disable")),
        Some(true) if !h.is_enabled() => commands.push(format!("delete {base} disable")),
        _ => {}
    }

    for wv in &w.vifs {
        let hv = h
            .vifs
            .iter()
            .find(|v| v.vlan_id == wv.vlan_id)
            .cloned()
            .unwrap_or(VifRecord {
                vlan_id: wv.vlan_id,
                ..VifRecord::default()
            });
        let path = format!("{base} vif {}", wv.vlan_id);
        if let Some(value) = &wv.description {
            if wv.description != hv.description {
                commands.push(set_attr(&path, "description", value));
            }
        }
        if let Some(value) = wv.mtu {
            if wv.mtu != hv.mtu {
                commands.push(set_attr(&path, "mtu", value));
            }
        }
        match wv.enabled {
            Some(false) if hv.is_enabled() => commands.push(format!("set {path} disable")),
            Some(true) if !hv.is_enabled() => commands.push(format!("delete {path} disable")),
            _ => {}
        }
    }
    Ok(commands)
}

/// Delete attributes set on the device that `want` leaves unset, for the
/// interface itself and each of its vifs. A `have` vif with no `want`
/// counterpart is purged outright.
fn clear_config(w: &InterfaceRecord, h: &InterfaceRecord) -> Result<Vec<String>> {
    let base = interface_path(&h.name)?;
    let mut commands = Vec::new();

    if h.description.is_some() && w.description.is_none() {
        commands.push(del_attr(&base, "description"));
    }
    if h.speed.is_some() && !is_auto(&h.speed) && w.speed.is_none() {
        commands.push(del_attr(&base, "speed"));
    }
    if h.duplex.is_some() && !is_auto(&h.duplex) && w.duplex.is_none() {
        commands.push(del_attr(&base, "duplex"));
    }
    if h.mtu.is_some() && w.mtu.is_none() {
        commands.push(del_attr(&base, "mtu"));
    }
    if !h.is_enabled() && w.enabled.is_none() {
        commands.push(del_attr(&base, "disable"));
    }

    for hv in &h.vifs {
        let path = format!("{base} vif {}", hv.vlan_id);
        match w.vifs.iter().find(|v| v.vlan_id == hv.vlan_id) {
            Some(wv) => {
                if hv.description.is_some() && wv.description.is_none() {
                    commands.push(del_attr(&path, "description"));
                }
                if hv.mtu.is_some() && wv.mtu.is_none() {
                    commands.push(del_attr(&path, "mtu"));
                }
                if !hv.is_enabled() && wv.enabled.is_none() {
                    commands.push(del_attr(&path, "disable"));
                }
            }
            None => commands.extend(purge_vif(&base, hv)),
        }
    }
    Ok(commands)
}

fn purge(h: &InterfaceRecord) -> Result<Vec<String>> {
    clear_config(&InterfaceRecord::named(&h.name), h)
}

fn purge_vif(base: &str, hv: &VifRecord) -> Vec<String> {
    let path = format!("{base} vif {}", hv.vlan_id);
    let mut commands = Vec::new();
    if hv.description.is_some() {
        commands.push(del_attr(&path, "description"));
    }
    if hv.mtu.is_some() {
        commands.push(del_attr(&path, "mtu"));
    }
    if !hv.is_enabled() {
        commands.push(del_attr(&path, "disable"));
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn have_eth0() -> InterfaceRecord {
        InterfaceRecord {
            description: Some("Uplink".to_string()),
            mtu: Some(1500),
            vifs: vec![VifRecord {
                vlan_id: 10,
                description: Some("Management".to_string()),
                ..VifRecord::default()
            }],
            ..InterfaceRecord::named("eth0")
        }
    }

    #[test]
    fn test_merged_creates_from_empty() {
        let want = vec![InterfaceRecord {
            description: Some("uplink".to_string()),
            enabled: Some(true),
            ..InterfaceRecord::named("eth2")
        }];
        let commands = VyosInterfaces.commands(State::Merged, &want, &[]).unwrap();
        // enabled matches the device default, so no disable handling
        assert_eq!(
            commands,
            vec!["set interfaces ethernet eth2 description 'uplink'"]
        );
    }

    #[test]
    fn test_merged_sets_vif_attributes() {
        let want = vec![InterfaceRecord {
            vifs: vec![VifRecord {
                vlan_id: 20,
                mtu: Some(1400),
                enabled: Some(false),
                ..VifRecord::default()
            }],
            ..InterfaceRecord::named("eth0")
        }];
        let commands = VyosInterfaces
            .commands(State::Merged, &want, &[have_eth0()])
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "set interfaces ethernet eth0 vif 20 mtu '1400'",
                "set interfaces ethernet eth0 vif 20 disable",
            ]
        );
    }

    #[test]
    fn test_replaced_clears_unlisted_and_purges_orphan_vif() {
        let want = vec![InterfaceRecord {
            mtu: Some(1500),
            ..InterfaceRecord::named("eth0")
        }];
        let commands = VyosInterfaces
            .commands(State::Replaced, &want, &[have_eth0()])
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "delete interfaces ethernet eth0 description",
                "delete interfaces ethernet eth0 vif 10 description",
            ]
        );
    }

    #[test]
    fn test_overridden_purges_orphan_interface() {
        let want = vec![have_eth0()];
        let have = vec![
            have_eth0(),
            InterfaceRecord {
                enabled: Some(false),
                ..InterfaceRecord::named("eth5")
            },
        ];
        let commands = VyosInterfaces
            .commands(State::Overridden, &want, &have)
            .unwrap();
        assert_eq!(commands, vec!["delete interfaces ethernet eth5 disable"]);
    }

    #[test]
    fn test_deleted_with_empty_want_purges_all() {
        let commands = VyosInterfaces
            .commands(State::Deleted, &[], &[have_eth0()])
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "delete interfaces ethernet eth0 description",
                "delete interfaces ethernet eth0 mtu",
                "delete interfaces ethernet eth0 vif 10 description",
            ]
        );
    }

    #[test]
    fn test_unknown_interface_name_is_rejected() {
        let want = vec![InterfaceRecord::named("wat0")];
        assert!(VyosInterfaces.commands(State::Merged, &want, &[]).is_err());
    }

    #[test]
    fn test_noop_on_equal_state() {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let commands = VyosInterfaces
                .commands(state, &[have_eth0()], &[have_eth0()])
                .unwrap();
            assert!(commands.is_empty(), "{state} should be a no-op");
        }
    }
}
