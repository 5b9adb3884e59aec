//! VLAN database entries on IOS.
//!
//! Unlike the interface resources, deletion here removes the whole entry
//! (`no vlan N`) rather than clearing attributes one by one; a VLAN with no
//! configuration is not a meaningful object.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::VlanRecord;
use crate::render::ScopedBlock;

/// Reconciles the VLAN database on IOS.
pub struct IosVlans;

impl ResourceModule for IosVlans {
    type Record = VlanRecord;

    fn name(&self) -> &'static str {
        "ios_vlans"
    }

    fn selector(&self) -> Option<&'static str> {
        Some("show vlan")
    }

    fn parse(&self, device_output: &str) -> Vec<VlanRecord> {
        facts::ios::parse_vlans(device_output)
    }

    fn validate(&self, want: &[VlanRecord]) -> Result<()> {
        for w in want {
            w.validate()?;
        }
        Ok(())
    }

    fn commands(
        &self,
        state: State,
        want: &[VlanRecord],
        have: &[VlanRecord],
    ) -> Result<Vec<String>> {
        let mut commands = Vec::new();
        match state {
            State::Merged => {
                for w in want {
                    let h = have_or_default(w.vlan_id, have);
                    commands.extend(set_config(w, &h).into_commands());
                }
            }
            State::Replaced => {
                for w in want {
                    let h = have_or_default(w.vlan_id, have);
                    commands.extend(converge(w, &h));
                }
            }
            State::Overridden => {
                for h in have {
                    if !want.iter().any(|w| w.vlan_id == h.vlan_id) {
                        commands.push(format!("no vlan {}", h.vlan_id));
                    }
                }
                for w in want {
                    let h = have_or_default(w.vlan_id, have);
                    commands.extend(converge(w, &h));
                }
            }
            State::Deleted => {
                if want.is_empty() {
                    for h in have {
                        commands.push(format!("no vlan {}", h.vlan_id));
                    }
                } else {
                    for w in want {
                        if have.iter().any(|h| h.vlan_id == w.vlan_id) {
                            commands.push(format!("no vlan {}", w.vlan_id));
                        }
                    }
                }
            }
        }
        Ok(commands)
    }
}

fn have_or_default(vlan_id: u16, have: &[VlanRecord]) -> VlanRecord {
    have.iter()
        .find(|h| h.vlan_id == vlan_id)
        .cloned()
        .unwrap_or_else(|| VlanRecord::new(vlan_id))
}

fn converge(w: &VlanRecord, h: &VlanRecord) -> Vec<String> {
    let mut block = clear_config(w, h);
    merge_into(&mut block, w, h);
    block.into_commands()
}

fn clear_config(w: &VlanRecord, h: &VlanRecord) -> ScopedBlock {
    let mut block = ScopedBlock::new(format!("vlan {}", w.vlan_id));
    if h.name.is_some() && w.name.is_none() {
        block.clear("name");
    }
    if h.state.is_some() && w.state.is_none() {
        block.clear("state");
    }
    if h.mtu.is_some() && w.mtu.is_none() {
        block.clear("mtu");
    }
    if h.remote_span && !w.remote_span {
        block.clear("remote-span");
    }
    if h.shutdown == Some(true) && w.shutdown.is_none() {
        block.clear("shutdown");
    }
    block
}

fn set_config(w: &VlanRecord, h: &VlanRecord) -> ScopedBlock {
    let mut block = ScopedBlock::new(format!("vlan {}", w.vlan_id));
    merge_into(&mut block, w, h);
    block
}

fn merge_into(block: &mut ScopedBlock, w: &VlanRecord, h: &VlanRecord) {
    if let Some(name) = &w.name {
        if w.name != h.name {
            block.set(format!("name {name}"));
        }
    }
    if let Some(state) = w.state {
        if w.state != h.state {
            block.set(format!("state {state}"));
        }
    }
    if let Some(mtu) = w.mtu {
        if w.mtu != h.mtu {
            block.set(format!("mtu {mtu}"));
        }
    }
    if w.remote_span && !h.remote_span {
        block.set("remote-span");
    }
    match w.shutdown {
        Some(true) if h.shutdown != Some(true) => block.set("shutdown"),
        Some(false) if h.shutdown == Some(true) => block.clear("shutdown"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VlanState;
    use pretty_assertions::assert_eq;

    fn have_ten() -> VlanRecord {
        VlanRecord {
            name: Some("ten".to_string()),
            state: Some(VlanState::Active),
            mtu: Some(1500),
            ..VlanRecord::new(10)
        }
    }

    #[test]
    fn test_merged_creates_missing_vlan() {
        let want = vec![VlanRecord {
            name: Some("twenty".to_string()),
            state: Some(VlanState::Suspend),
            ..VlanRecord::new(20)
        }];
        let commands = IosVlans.commands(State::Merged, &want, &[have_ten()]).unwrap();
        assert_eq!(commands, vec!["vlan 20", "name twenty", "state suspend"]);
    }

    #[test]
    fn test_merged_noop_when_equal() {
        let commands = IosVlans
            .commands(State::Merged, &[have_ten()], &[have_ten()])
            .unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_replaced_clears_omitted_attributes() {
        let want = vec![VlanRecord {
            name: Some("ten".to_string()),
            ..VlanRecord::new(10)
        }];
        let commands = IosVlans
            .commands(State::Replaced, &want, &[have_ten()])
            .unwrap();
        assert_eq!(commands, vec!["vlan 10", "no state", "no mtu"]);
    }

    #[test]
    fn test_overridden_removes_orphan_vlans() {
        let want = vec![have_ten()];
        let have = vec![have_ten(), VlanRecord::new(99)];
        let commands = IosVlans.commands(State::Overridden, &want, &have).unwrap();
        assert_eq!(commands, vec!["no vlan 99"]);
    }

    #[test]
    fn test_deleted_with_empty_want_removes_all() {
        let have = vec![have_ten(), VlanRecord::new(20)];
        let commands = IosVlans.commands(State::Deleted, &[], &have).unwrap();
        assert_eq!(commands, vec!["no vlan 10", "no vlan 20"]);
    }

    #[test]
    fn test_deleted_ignores_absent_vlans() {
        let want = vec![VlanRecord::new(42)];
        let commands = IosVlans
            .commands(State::Deleted, &want, &[have_ten()])
            .unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_shutdown_toggles() {
        let want = vec![VlanRecord {
            shutdown: Some(false),
            ..VlanRecord::new(10)
        }];
        let have = vec![VlanRecord {
            shutdown: Some(true),
            ..VlanRecord::new(10)
        }];
        let commands = IosVlans.commands(State::Merged, &want, &have).unwrap();
        assert_eq!(commands, vec!["vlan 10", "no shutdown"]);
    }
}
