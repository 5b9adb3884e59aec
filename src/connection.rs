//! Device connection abstraction.
//!
//! The engine never talks to a device directly; it consumes the two
//! collaborator operations defined here. Transports (SSH CLI, NETCONF, REST)
//! live outside this crate and implement [`DeviceConnection`].
//!
//! One reconciliation run performs at most three collaborator calls: one
//! fetch to build `have`, one apply, and one re-fetch for the `after` facts.
//! Both operations are synchronous; timeout and retry policy belong to the
//! transport, not to the engine.

use crate::error::{Error, Result};
use parking_lot::Mutex;

/// A synchronous connection to a single network device.
pub trait DeviceConnection: Send + Sync {
    /// Fetch the raw running configuration.
    ///
    /// `selector` is a platform-specific filter expression appended to the
    /// show command (e.g. `"| section ^interface"`); `None` fetches the full
    /// configuration. The returned text must be unprocessed device output.
    fn fetch_running_config(&self, selector: Option<&str>) -> Result<String>;

    /// Push an ordered command batch to the device.
    ///
    /// Succeed-or-error from the engine's perspective: a partial apply is
    /// reported as an error and never rolled back.
    fn apply(&self, commands: &[String]) -> Result<()>;
}

/// A fixture-backed connection serving canned configuration text.
///
/// Used by the test suites and for offline dry runs: `apply` records each
/// batch instead of touching a device, and the served configuration can be
/// swapped to simulate convergence between runs.
#[derive(Debug, Default)]
pub struct StaticConnection {
    running_config: Mutex<String>,
    applied: Mutex<Vec<Vec<String>>>,
    fail_fetch: Mutex<Option<String>>,
    fail_apply: Mutex<Option<String>>,
}

impl StaticConnection {
    /// Create a connection that serves the given running configuration.
    pub fn new(running_config: impl Into<String>) -> Self {
        Self {
            running_config: Mutex::new(running_config.into()),
            applied: Mutex::new(Vec::new()),
            fail_fetch: Mutex::new(None),
            fail_apply: Mutex::new(None),
        }
    }

    /// Replace the served configuration (simulates device convergence).
    pub fn set_running_config(&self, config: impl Into<String>) {
        *self.running_config.lock() = config.into();
    }

    /// All command batches applied so far, in order.
    pub fn applied(&self) -> Vec<Vec<String>> {
        self.applied.lock().clone()
    }

    /// Make the next `fetch_running_config` call fail with the given message.
    pub fn fail_next_fetch(&self, message: impl Into<String>) {
        *self.fail_fetch.lock() = Some(message.into());
    }

    /// Make the next `apply` call fail with the given device message.
    pub fn fail_next_apply(&self, message: impl Into<String>) {
        *self.fail_apply.lock() = Some(message.into());
    }
}

impl DeviceConnection for StaticConnection {
    fn fetch_running_config(&self, _selector: Option<&str>) -> Result<String> {
        if let Some(message) = self.fail_fetch.lock().take() {
            return Err(Error::connection(message));
        }
        Ok(self.running_config.lock().clone())
    }

    fn apply(&self, commands: &[String]) -> Result<()> {
        if let Some(message) = self.fail_apply.lock().take() {
            return Err(Error::apply(message, commands));
        }
        self.applied.lock().push(commands.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_connection_serves_config() {
        let conn = StaticConnection::new("interface GigabitEthernet0/1\n description uplink");
        let text = conn.fetch_running_config(Some("| section ^interface")).unwrap();
        assert!(text.contains("description uplink"));
    }

    #[test]
    fn test_static_connection_records_batches() {
        let conn = StaticConnection::new("");
        conn.apply(&["vlan 10".to_string(), "name ten".to_string()]).unwrap();
        conn.apply(&["no vlan 20".to_string()]).unwrap();
        let applied = conn.applied();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], vec!["vlan 10", "name ten"]);
    }

    #[test]
    fn test_static_connection_injected_fetch_failure() {
        let conn = StaticConnection::new("interface GigabitEthernet0/1\n!");
        conn.fail_next_fetch("connection reset by peer");
        let err = conn.fetch_running_config(None).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        // Failure is one-shot
        assert!(conn.fetch_running_config(None).is_ok());
    }

    #[test]
    fn test_static_connection_injected_failure() {
        let conn = StaticConnection::new("");
        conn.fail_next_apply("% Invalid input detected");
        let err = conn.apply(&["bogus".to_string()]).unwrap_err();
        assert!(err.to_string().contains("% Invalid input detected"));
        // Failure is one-shot
        conn.apply(&["vlan 10".to_string()]).unwrap();
        assert_eq!(conn.applied().len(), 1);
    }
}
