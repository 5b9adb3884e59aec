//! VyOS resource modules.
//!
//! VyOS renders flat: every command is a full `set <path> '<value>'` or
//! `delete <path> [<attr>]` line, so there is no scoping block to manage.
//! Values are quoted on set and omitted on delete.

pub mod interfaces;
pub mod l3_interfaces;
pub mod lag_interfaces;
pub mod lldp;

pub use interfaces::VyosInterfaces;
pub use l3_interfaces::VyosL3Interfaces;
pub use lag_interfaces::VyosLagInterfaces;
pub use lldp::VyosLldp;

use crate::error::{Error, Result};
use crate::utils::vyos_interface_type;

/// Config-tree path of an interface (`interfaces ethernet eth0`).
pub(crate) fn interface_path(name: &str) -> Result<String> {
    let kind = vyos_interface_type(name).ok_or_else(|| {
        Error::validation(format!("unrecognized interface name '{name}'"))
    })?;
    Ok(format!("interfaces {kind} {name}"))
}

pub(crate) fn set_attr(path: &str, attr: &str, value: impl std::fmt::Display) -> String {
    format!("set {path} {attr} '{value}'")
}

pub(crate) fn del_attr(path: &str, attr: &str) -> String {
    format!("delete {path} {attr}")
}
