//! Cisco IOS resource modules.
//!
//! IOS renders block-style: a scoping line (`interface GigabitEthernet0/1`,
//! `vlan 10`) followed by attribute commands, with `no <attr>` as the clear
//! form. Every module here builds one [`crate::render::ScopedBlock`] pair
//! (clears, then sets) per record and collapses the duplicate scope line, so
//! a record whose diff is empty contributes zero lines.

pub mod interfaces;
pub mod l2_interfaces;
pub mod l3_interfaces;
pub mod vlans;

pub use interfaces::IosInterfaces;
pub use l2_interfaces::IosL2Interfaces;
pub use l3_interfaces::IosL3Interfaces;
pub use vlans::IosVlans;

/// Section filter for interface-scoped resources.
pub(crate) const INTERFACE_SECTION: &str = "| section ^interface";

pub(crate) fn interface_scope(name: &str) -> String {
    format!("interface {name}")
}
