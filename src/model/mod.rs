//! Normalized resource records.
//!
//! These types are the canonical structured representation shared between
//! the facts layer (which produces `have` from device text) and the
//! reconciliation modules (which consume `want` and `have`). Records carry
//! optional fields rather than missing-key sentinels; `None` always means
//! "not configured / not specified".

pub mod interfaces;
pub mod l2_interfaces;
pub mod l3_interfaces;
pub mod lag_interfaces;
pub mod lldp;
pub mod vlans;

pub use interfaces::{InterfaceMode, InterfaceRecord, VifRecord};
pub use l2_interfaces::{AccessConfig, L2InterfaceRecord, TrunkConfig};
pub use l3_interfaces::{Ipv4Address, Ipv6Address, L3InterfaceRecord, L3Vif};
pub use lag_interfaces::{ArpMonitor, LagMember, LagRecord};
pub use lldp::LldpRecord;
pub use vlans::{VlanRecord, VlanState};
