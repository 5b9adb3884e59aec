//! Basic interface settings on IOS.

use crate::engine::{ResourceModule, State};
use crate::error::Result;
use crate::facts;
use crate::model::{InterfaceMode, InterfaceRecord};
use crate::render::{collapse_scopes, ScopedBlock};
use crate::utils::{find_by_key, normalize_interface};

use super::{interface_scope, INTERFACE_SECTION};

/// Reconciles description, enablement, speed/duplex/MTU and switched/routed
/// mode on IOS interfaces.
pub struct IosInterfaces;

impl ResourceModule for IosInterfaces {
    type Record = InterfaceRecord;

    fn name(&self) -> &'static str {
        "ios_interfaces"
    }

    fn selector(&self) -> Option<&'static str> {
        Some(INTERFACE_SECTION)
    }

    fn parse(&self, running_config: &str) -> Vec<InterfaceRecord> {
        facts::ios::parse_interfaces(running_config)
    }

    fn commands(
        &self,
        state: State,
        want: &[InterfaceRecord],
        have: &[InterfaceRecord],
    ) -> Result<Vec<String>> {
        let mut commands = Vec::new();
        match state {
            State::Merged | State::Replaced => {
                for w in want {
                    let name = normalize_interface(&w.name);
                    let h = have_or_default(&name, have);
                    if state == State::Replaced {
                        commands.extend(converge(&name, w, &h));
                    } else {
                        commands.extend(set_config(&name, w, &h).into_commands());
                    }
                }
            }
            State::Overridden => {
                for h in have {
                    if find_want(want, &h.name).is_none() {
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

fn have_or_default(name: &str, have: &[InterfaceRecord]) -> InterfaceRecord {
    find_by_key(name, have, |r| &r.name)
        .cloned()
        .unwrap_or_else(|| InterfaceRecord::named(name))
}

fn find_want<'a>(want: &'a [InterfaceRecord], name: &str) -> Option<&'a InterfaceRecord> {
    want.iter()
        .find(|w| normalize_interface(&w.name) == name)
}

/// Clears followed by sets for one record, under a single scope line.
fn converge(name: &str, w: &InterfaceRecord, h: &InterfaceRecord) -> Vec<String> {
    let mut commands = clear_config(name, w, h).into_commands();
    commands.extend(set_config(name, w, h).into_commands());
    collapse_scopes(commands, "interface ")
}

fn is_auto(value: &Option<String>) -> bool {
    value.as_deref() == Some("auto")
}

/// Clear attributes the device has set that `want` leaves unset. Attributes
/// `want` will overwrite are left to the set phase.
fn clear_config(name: &str, w: &InterfaceRecord, h: &InterfaceRecord) -> ScopedBlock {
    let mut block = ScopedBlock::new(interface_scope(name));
    if h.description.is_some() && w.description.is_none() {
        block.clear("description");
    }
    // speed/duplex `auto` is the unconfigured sentinel, never cleared
    if h.speed.is_some() && !is_auto(&h.speed) && w.speed.is_none() {
        block.clear("speed");
    }
    if h.duplex.is_some() && !is_auto(&h.duplex) && w.duplex.is_none() {
        block.clear("duplex");
    }
    if h.mtu.is_some() && w.mtu.is_none() {
        block.clear("mtu");
    }
    if !h.is_enabled() && w.enabled.is_none() {
        block.clear("shutdown");
    }
    block
}

fn set_config(name: &str, w: &InterfaceRecord, h: &InterfaceRecord) -> ScopedBlock {
    let mut block = ScopedBlock::new(interface_scope(name));
    // mode must precede mode-specific commands
    if let Some(mode) = w.mode {
        if Some(mode) != h.mode {
            match mode {
                InterfaceMode::Layer2 => block.set("switchport"),
                InterfaceMode::Layer3 => block.set("no switchport"),
            }
        }
    }
    if let Some(value) = &w.description {
        if w.description != h.description {
            block.set(format!("description {value}"));
        }
    }
    if let Some(value) = &w.speed {
        if value != "auto" && w.speed != h.speed {
            block.set(format!("speed {value}"));
        }
    }
    if let Some(value) = &w.duplex {
        if value != "auto" && w.duplex != h.duplex {
            block.set(format!("duplex {value}"));
        }
    }
    if let Some(value) = w.mtu {
        if w.mtu != h.mtu {
            block.set(format!("mtu {value}"));
        }
    }
    match w.enabled {
        Some(true) if !h.is_enabled() => block.clear("shutdown"),
        Some(false) if h.is_enabled() => block.set("shutdown"),
        _ => {}
    }
    block
}

/// Drive every configured attribute back to its default.
fn purge(h: &InterfaceRecord) -> Vec<String> {
    clear_config(&h.name, &InterfaceRecord::named(&h.name), h).into_commands()
}
