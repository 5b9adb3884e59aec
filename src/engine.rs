//! The reconciliation engine.
//!
//! One invocation runs exactly one policy over one resource on one device:
//! fetch the running configuration, parse it into `have`, compute the command
//! delta against `want`, and apply it unless check mode is set. The engine is
//! stateless between invocations; the device's own configuration is the only
//! memory.

use crate::connection::DeviceConnection;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use similar::TextDiff;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// Reconciliation Policies
// ============================================================================

/// The four terminal reconciliation policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Additive: set wanted attributes, never clear omitted ones. Records in
    /// `have` absent from `want` are untouched.
    #[default]
    Merged,
    /// Full convergence of each wanted record: omitted attributes that the
    /// device has set are cleared. Unlisted records are untouched.
    Replaced,
    /// Replaced, plus every `have` record with no counterpart in `want` is
    /// driven back to defaults.
    Overridden,
    /// Clear every settable attribute of the named records (or of all
    /// records, when `want` is empty).
    Deleted,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Merged => write!(f, "merged"),
            State::Replaced => write!(f, "replaced"),
            State::Overridden => write!(f, "overridden"),
            State::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "merged" => Ok(State::Merged),
            "replaced" => Ok(State::Replaced),
            "overridden" => Ok(State::Overridden),
            "deleted" => Ok(State::Deleted),
            _ => Err(Error::validation(format!(
                "Unknown state: {s}. Valid options: merged, replaced, overridden, deleted"
            ))),
        }
    }
}

// ============================================================================
// Invocation Context
// ============================================================================

/// The validated argument bundle for one reconciliation run.
///
/// Immutable per invocation and passed explicitly; modules hold no mutable
/// shared defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationContext {
    /// Which policy to run.
    pub state: State,
    /// Compute and report commands without applying them.
    pub check_mode: bool,
}

impl ReconciliationContext {
    pub fn new(state: State) -> Self {
        Self {
            state,
            check_mode: false,
        }
    }

    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }
}

// ============================================================================
// Resource Module Trait
// ============================================================================

/// A per-platform, per-resource reconciliation module.
///
/// Implementations own the three resource-specific pieces: the facts parser,
/// desired-state validation, and the per-policy command generators. The
/// shared driver [`reconcile`] wires them to a device connection.
pub trait ResourceModule {
    /// The normalized record type for this resource.
    type Record: Clone + PartialEq + Serialize;

    /// Module name, e.g. `ios_l2_interfaces`.
    fn name(&self) -> &'static str;

    /// Platform-specific filter passed to `fetch_running_config`.
    fn selector(&self) -> Option<&'static str> {
        None
    }

    /// Parse raw device text into `have` records.
    ///
    /// Best effort: malformed blocks are skipped, never fatal. Output order
    /// is source-text order.
    fn parse(&self, running_config: &str) -> Vec<Self::Record>;

    /// Validate the desired state before any device interaction.
    fn validate(&self, _want: &[Self::Record]) -> Result<()> {
        Ok(())
    }

    /// Generate the ordered command list converging `have` toward `want`
    /// under the given policy. An empty list means the device already
    /// matches.
    fn commands(
        &self,
        state: State,
        want: &[Self::Record],
        have: &[Self::Record],
    ) -> Result<Vec<String>>;
}

// ============================================================================
// Reconciliation Report
// ============================================================================

/// The result of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport<R> {
    /// Whether a command set was computed (true in check mode too).
    pub changed: bool,
    /// The ordered commands; always populated, even when check mode
    /// suppressed application.
    pub commands: Vec<String>,
    /// Facts as parsed before any change.
    pub before: Vec<R>,
    /// Facts re-parsed after application; present only when changed and not
    /// in check mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Vec<R>>,
}

impl<R: Serialize> ModuleReport<R> {
    /// Unified diff of the serialized before/after record state, when an
    /// `after` snapshot exists.
    pub fn state_diff(&self) -> Option<String> {
        let after = self.after.as_ref()?;
        let before = serde_json::to_string_pretty(&self.before).ok()?;
        let after = serde_json::to_string_pretty(after).ok()?;
        let diff = TextDiff::from_lines(&before, &after);
        Some(diff.unified_diff().header("before", "after").to_string())
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Run one reconciliation: fetch, parse, diff, render, apply.
///
/// Validation failures abort before any device interaction. Check mode
/// short-circuits the apply step but still computes and returns the full
/// command list for inspection.
pub fn reconcile<M: ResourceModule>(
    module: &M,
    connection: &dyn DeviceConnection,
    want: &[M::Record],
    context: ReconciliationContext,
) -> Result<ModuleReport<M::Record>> {
    module.validate(want)?;

    let raw = connection.fetch_running_config(module.selector())?;
    let before = module.parse(&raw);

    let commands = module.commands(context.state, want, &before)?;
    let changed = !commands.is_empty();
    debug!(
        module = module.name(),
        state = %context.state,
        check_mode = context.check_mode,
        commands = commands.len(),
        "computed command set"
    );

    let after = if changed && !context.check_mode {
        connection.apply(&commands)?;
        let raw = connection.fetch_running_config(module.selector())?;
        Some(module.parse(&raw))
    } else {
        None
    };

    Ok(ModuleReport {
        changed,
        commands,
        before,
        after,
    })
}
