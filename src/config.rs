//! Facade configuration

use std::time::Duration;

/// How sessions on one device may overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPolicy {
    /// One session at a time, process-wide for the facade instance
    #[default]
    Serialized,
    /// Sessions may overlap; only for devices documented as reentrant
    Concurrent,
}

/// Configuration for an [`crate::Hsm`] facade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsmConfig {
    /// Whether device access is serialized
    pub session_policy: SessionPolicy,
    /// Device calls slower than this are logged at warn level
    pub slow_call_threshold: Duration,
}

impl HsmConfig {
    pub const DEFAULT_SLOW_CALL_THRESHOLD: Duration = Duration::from_secs(5);
}

impl Default for HsmConfig {
    fn default() -> Self {
        Self {
            session_policy: SessionPolicy::default(),
            slow_call_threshold: Self::DEFAULT_SLOW_CALL_THRESHOLD,
        }
    }
}
