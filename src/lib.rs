//! # Netible - Declarative Network Device Configuration
//!
//! Netible reconciles declarative resource descriptions against the live
//! configuration of network devices. Each resource module parses the device's
//! running configuration into normalized facts, diffs them attribute by
//! attribute against the desired state, and renders the minimal ordered
//! command set that converges the device. Running the same description twice
//! yields zero commands.
//!
//! ## Core Concepts
//!
//! - **Records**: Normalized, typed per-resource state (interfaces, VLANs,
//!   IP addressing, link aggregation, LLDP)
//! - **Resource Modules**: Per-platform units pairing a facts parser with
//!   per-policy command generators
//! - **Policies**: The four reconciliation policies - `merged`, `replaced`,
//!   `overridden`, `deleted`
//! - **Facts**: Records parsed back out of raw device text, reported before
//!   and after every change
//! - **Connections**: Transport abstraction for fetching configuration and
//!   applying command batches
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Reconciliation Engine                            │
//! │            (validate, fetch, parse, diff, apply)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          ▼                         ▼                         ▼
//! ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────────┐
//! │  Facts Parsers  │   │  Resource Modules   │   │  Command Renderer   │
//! │  (device text   │   │  (per-platform      │   │  (scoped blocks,    │
//! │   -> records)   │   │   diff logic)       │   │   flat set/delete)  │
//! └─────────────────┘   └─────────────────────┘   └─────────────────────┘
//!          │                         │                         │
//!          └─────────────────────────┼─────────────────────────┘
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Device Connection                               │
//! │               (SSH CLI, NETCONF, test fixtures)                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use netible::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let connection = StaticConnection::new(
//!         "interface GigabitEthernet0/1\n shutdown\n",
//!     );
//!     let want = vec![InterfaceRecord {
//!         name: "gi0/1".to_string(),
//!         description: Some("uplink".to_string()),
//!         enabled: Some(true),
//!         ..InterfaceRecord::default()
//!     }];
//!
//!     let context = ReconciliationContext::new(State::Merged).with_check_mode(true);
//!     let report = reconcile(&IosInterfaces, &connection, &want, context)?;
//!
//!     assert!(report.changed);
//!     assert_eq!(
//!         report.commands,
//!         vec![
//!             "interface GigabitEthernet0/1",
//!             "description uplink",
//!             "no shutdown",
//!         ]
//!     );
//!     Ok(())
//! }
//! ```

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports for common usage.
    //!
    //! ```rust,ignore
    //! use netible::prelude::*;
    //! ```

    // Error handling
    pub use crate::error::{Error, Result};

    // Engine
    pub use crate::engine::{
        reconcile, ModuleReport, ReconciliationContext, ResourceModule, State,
    };

    // Connections
    pub use crate::connection::{DeviceConnection, StaticConnection};

    // Resource records
    pub use crate::model::{
        AccessConfig, ArpMonitor, InterfaceMode, InterfaceRecord, Ipv4Address, Ipv6Address,
        L2InterfaceRecord, L3InterfaceRecord, L3Vif, LagMember, LagRecord, LldpRecord,
        TrunkConfig, VifRecord, VlanRecord, VlanState,
    };

    // Platform modules
    pub use crate::modules::ios::{IosInterfaces, IosL2Interfaces, IosL3Interfaces, IosVlans};
    pub use crate::modules::vyos::{
        VyosInterfaces, VyosL3Interfaces, VyosLagInterfaces, VyosLldp,
    };
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result alias for reconciliation operations.
pub mod error;

/// The device connection trait and the fixture-backed test transport.
pub mod connection;

/// The policy-driven reconciliation engine and the [`ResourceModule`]
/// trait that platform modules implement.
///
/// [`ResourceModule`]: engine::ResourceModule
pub mod engine;

// ============================================================================
// Resource State
// ============================================================================

/// Normalized record types shared by all platforms.
///
/// Records are the pivot of the whole crate: facts parsers produce them,
/// desired state deserializes into them, and command generation diffs two
/// collections of them.
pub mod model;

/// Facts parsers turning raw device text into records.
pub mod facts;

// ============================================================================
// Platform Modules
// ============================================================================

/// Per-platform resource modules (Cisco IOS, VyOS).
pub mod modules;

/// Command-list assembly helpers for block-scoped CLIs.
pub mod render;

/// Platform name handling and small list/diff utilities.
pub mod utils;
