//! Bonding (LAG) groups on VyOS.
//!
//! Group attributes live on the bond's own path; membership lives on each
//! member interface (`set interfaces ethernet ethN bond-group <lag>`). A
//! member belongs to at most one group, so moving one renders an explicit
//! delete-then-set pair against the member's own scope.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::LagRecord;
use crate::utils::find_by_key;

use super::{del_attr, set_attr};

/// Reconciles bonding groups and their membership on VyOS.
pub struct VyosLagInterfaces;

impl ResourceModule for VyosLagInterfaces {
    type Record = LagRecord;

    fn name(&self) -> &'static str {
        "vyos_lag_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some("| grep interfaces")
    }

    fn parse(&self, running_config: &str) -> Vec<LagRecord> {
        facts::vyos::parse_lag_interfaces(running_config)
    }

    fn commands(
        &self,
        state: State,
        want: &[LagRecord],
        have: &[LagRecord],
    ) -> Result<Vec<String>> {
        let mut commands = Vec::new();
        match state {
            State::Merged => {
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(set_config(w, &h, have));
                }
            }
            State::Replaced => {
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(clear_config(w, &h));
                    commands.extend(set_config(w, &h, have));
                }
            }
            State::Overridden => {
                for h in have {
                    if find_by_key(&h.name, want, |r| &r.name).is_none() {
                        commands.extend(purge(h));
                    }
                }
                for w in want {
                    let h = have_or_default(&w.name, have);
                    commands.extend(clear_config(w, &h));
                    commands.extend(set_config(w, &h, have));
                }
            }
            State::Deleted => {
                if want.is_empty() {
                    for h in have {
                        commands.extend(purge(h));
                    }
                } else {
                    for w in want {
                        if let Some(h) = find_by_key(&w.name, have, |r| &r.name) {
                            commands.extend(purge(h));
                        }
                    }
                }
            }
        }
        Ok(commands)
    }
}

fn have_or_default(name: &str, have: &[LagRecord]) -> LagRecord {
    find_by_key(name, have, |r| &r.name)
        .cloned()
        .unwrap_or_else(|| LagRecord::named(name))
}

fn lag_path(name: &str) -> String {
    format!("interfaces bonding {name}")
}

fn member_path(member: &str) -> String {
    format!("interfaces ethernet {member}")
}

fn set_config(w: &LagRecord, h: &LagRecord, have: &[LagRecord]) -> Vec<String> {
    let base = lag_path(&w.name);
    let mut commands = Vec::new();

    if let Some(mode) = &w.mode {
        if w.mode != h.mode {
            commands.push(set_attr(&base, "mode", mode));
        }
    }
    if let Some(hash_policy) = &w.hash_policy {
        if w.hash_policy != h.hash_policy {
            commands.push(set_attr(&base, "hash-policy", hash_policy));
        }
    }
    if let Some(primary) = &w.primary {
        if w.primary != h.primary {
            commands.push(set_attr(&base, "primary", primary));
        }
    }
    if let Some(arp) = &w.arp_monitor {
        let have_arp = h.arp_monitor.clone().unwrap_or_default();
        if let Some(interval) = arp.interval {
            if arp.interval != have_arp.interval {
                commands.push(set_attr(&base, "arp-monitor interval", interval));
            }
        }
        for target in &arp.targets {
            if !have_arp.targets.contains(target) {
                commands.push(set_attr(&base, "arp-monitor target", target));
            }
        }
    }

    for member in &w.members {
        if h.has_member(&member.member) {
            continue;
        }
        // enslaved elsewhere: explicit remove before the add
        let owner = have
            .iter()
            .find(|other| other.name != w.name && other.has_member(&member.member));
        if owner.is_some() {
            commands.push(del_attr(&member_path(&member.member), "bond-group"));
        }
        commands.push(set_attr(
            &member_path(&member.member),
            "bond-group",
            &w.name,
        ));
    }
    commands
}

fn clear_config(w: &LagRecord, h: &LagRecord) -> Vec<String> {
    let base = lag_path(&h.name);
    let mut commands = Vec::new();

    if h.mode.is_some() && w.mode.is_none() {
        commands.push(del_attr(&base, "mode"));
    }
    if h.hash_policy.is_some() && w.hash_policy.is_none() {
        commands.push(del_attr(&base, "hash-policy"));
    }
    if h.primary.is_some() && w.primary.is_none() {
        commands.push(del_attr(&base, "primary"));
    }
    match (&w.arp_monitor, &h.arp_monitor) {
        (None, Some(_)) => commands.push(del_attr(&base, "arp-monitor")),
        (Some(want_arp), Some(have_arp)) => {
            if want_arp.interval.is_none() && have_arp.interval.is_some() {
                commands.push(del_attr(&base, "arp-monitor interval"));
            }
            for target in &have_arp.targets {
                if !want_arp.targets.contains(target) {
                    commands.push(format!("delete {base} arp-monitor target '{target}'"));
                }
            }
        }
        _ => {}
    }
    for member in &h.members {
        if !w.has_member(&member.member) {
            commands.push(del_attr(&member_path(&member.member), "bond-group"));
        }
    }
    commands
}

fn purge(h: &LagRecord) -> Vec<String> {
    clear_config(&LagRecord::named(&h.name), h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArpMonitor, LagMember};
    use pretty_assertions::assert_eq;

    fn bond0() -> LagRecord {
        LagRecord {
            mode: Some("802.3ad".to_string()),
            members: vec![LagMember::new("eth1")],
            ..LagRecord::named("bond0")
        }
    }

    #[test]
    fn test_merged_sets_mode_and_members() {
        let want = vec![LagRecord {
            mode: Some("802.3ad".to_string()),
            members: vec![LagMember::new("eth1"), LagMember::new("eth2")],
            ..LagRecord::named("bond0")
        }];
        let commands = VyosLagInterfaces
            .commands(State::Merged, &want, &[bond0()])
            .unwrap();
        assert_eq!(
            commands,
            vec!["set interfaces ethernet eth2 bond-group 'bond0'"]
        );
    }

    #[test]
    fn test_member_reassignment_is_remove_then_add() {
        let want = vec![LagRecord {
            members: vec![LagMember::new("eth1")],
            ..LagRecord::named("bond2")
        }];
        let have = vec![LagRecord {
            members: vec![LagMember::new("eth1")],
            ..LagRecord::named("bond1")
        }];
        let commands = VyosLagInterfaces
            .commands(State::Merged, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "delete interfaces ethernet eth1 bond-group",
                "set interfaces ethernet eth1 bond-group 'bond2'",
            ]
        );
    }

    #[test]
    fn test_replaced_clears_unlisted_attributes_and_members() {
        let want = vec![LagRecord {
            members: vec![LagMember::new("eth3")],
            ..LagRecord::named("bond0")
        }];
        let have = vec![LagRecord {
            arp_monitor: Some(ArpMonitor {
                interval: Some(60),
                targets: vec!["192.0.2.254".to_string()],
            }),
            ..bond0()
        }];
        let commands = VyosLagInterfaces
            .commands(State::Replaced, &want, &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "delete interfaces bonding bond0 mode",
                "delete interfaces bonding bond0 arp-monitor",
                "delete interfaces ethernet eth1 bond-group",
                "set interfaces ethernet eth3 bond-group 'bond0'",
            ]
        );
    }

    #[test]
    fn test_deleted_purges_group() {
        let have = vec![LagRecord {
            hash_policy: Some("layer2".to_string()),
            ..bond0()
        }];
        let commands = VyosLagInterfaces
            .commands(State::Deleted, &[], &have)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "delete interfaces bonding bond0 mode",
                "delete interfaces bonding bond0 hash-policy",
                "delete interfaces ethernet eth1 bond-group",
            ]
        );
    }

    #[test]
    fn test_noop_on_equal_state() {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let commands = VyosLagInterfaces
                .commands(state, &[bond0()], &[bond0()])
                .unwrap();
            assert!(commands.is_empty(), "{state} should be a no-op");
        }
    }
}
