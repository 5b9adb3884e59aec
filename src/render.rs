//! Command rendering primitives.
//!
//! Block-style platforms (IOS family) nest attribute commands under a scoping
//! line such as `interface GigabitEthernet0/1`. [`ScopedBlock`] accumulates
//! sub-commands and emits the scoping line exactly once, and only when at
//! least one sub-command exists: an empty diff renders zero lines, including
//! no bare scope line, which is what makes a re-run a true no-op.

/// Accumulates commands under a single scoping line.
#[derive(Debug, Clone)]
pub struct ScopedBlock {
    scope: String,
    commands: Vec<String>,
}

impl ScopedBlock {
    /// Create an empty block for the given scope (e.g. `interface Gi0/1`).
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            commands: Vec::new(),
        }
    }

    /// The scoping line this block renders under.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Append a set-command, skipping exact duplicates.
    pub fn set(&mut self, cmd: impl Into<String>) {
        let cmd = cmd.into();
        if !self.commands.contains(&cmd) {
            self.commands.push(cmd);
        }
    }

    /// Append a clear-command (`no <cmd>`), skipping exact duplicates.
    pub fn clear(&mut self, cmd: impl AsRef<str>) {
        self.set(format!("no {}", cmd.as_ref()));
    }

    /// Whether any sub-command has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Render the block: scope line followed by its sub-commands, or nothing
    /// at all when the block is empty.
    pub fn into_commands(self) -> Vec<String> {
        if self.commands.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(self.commands.len() + 1);
        out.push(self.scope);
        out.extend(self.commands);
        out
    }
}

/// Collapse repeated scoping lines in a command list.
///
/// When a record's clear batch and set batch were rendered independently the
/// scope line appears twice; the device only needs it once per record, so a
/// scope line matching the one currently in effect is dropped. A scope that
/// re-appears after a different scope intervened is kept, so sub-commands
/// never land under the wrong scope in a multi-record list.
pub fn collapse_scopes(commands: Vec<String>, scope_prefix: &str) -> Vec<String> {
    let mut current_scope: Option<String> = None;
    let mut out = Vec::with_capacity(commands.len());
    for cmd in commands {
        if cmd.starts_with(scope_prefix) {
            if current_scope.as_deref() == Some(cmd.as_str()) {
                continue;
            }
            current_scope = Some(cmd.clone());
        }
        out.push(cmd);
    }
    out
}
