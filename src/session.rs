//! Scoped device sessions
//!
//! Every operation runs inside [`SessionManager::with_session`]. The handle
//! lives in a guard whose `Drop` finalizes it, so it is released on success,
//! on an early error return and while unwinding from a panic.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::{HsmConfig, SessionPolicy};
use crate::error::{HsmError, HsmResult, SessionStage};
use crate::logic::Operation;
use crate::model::DeviceConfig;
use crate::ports::SessionProvider;

/// Opens and closes device sessions around single operations
#[derive(Debug)]
pub struct SessionManager<D> {
    device: D,
    config: HsmConfig,
    lock: Mutex<()>,
}

impl<D: SessionProvider> SessionManager<D> {
    pub fn new(device: D, config: HsmConfig) -> Self {
        Self {
            device,
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn config(&self) -> &HsmConfig {
        &self.config
    }

    /// Run `f` with a freshly opened session and close it before returning.
    ///
    /// `f` is never called when the session cannot be opened.
    pub fn with_session<T, F>(&self, config: &DeviceConfig, f: F) -> HsmResult<T>
    where
        F: FnOnce(&D, &mut D::Session) -> HsmResult<T>,
    {
        let mut guard = self.open(config)?;
        f(&self.device, guard.session_mut())
    }

    /// Time a device call, warning when it exceeds the configured threshold.
    ///
    /// The device offers no cancellation, so a slow call can only be reported.
    pub fn timed<T>(&self, op: Operation, call: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = call();
        let elapsed = started.elapsed();
        if elapsed > self.config.slow_call_threshold {
            warn!("Device {} took {:?}", op, elapsed);
        }
        result
    }

    fn open(&self, config: &DeviceConfig) -> HsmResult<SessionGuard<'_, D>> {
        let lock = match self.config.session_policy {
            // a panic inside an earlier session poisons the lock, but its
            // guard has already finalized the handle
            SessionPolicy::Serialized => {
                Some(self.lock.lock().unwrap_or_else(PoisonError::into_inner))
            }
            SessionPolicy::Concurrent => None,
        };

        debug!("Initializing device session with config {:?}", config);
        let session = self.device.initialize(config).map_err(|code| {
            warn!("Failed to {} device session: status {}", SessionStage::Initialize, code);
            HsmError::Session {
                stage: SessionStage::Initialize,
                code,
            }
        })?;

        Ok(SessionGuard {
            device: &self.device,
            session: Some(session),
            _lock: lock,
        })
    }
}

/// Owns an open session; finalizes it on drop, then releases the lock
struct SessionGuard<'a, D: SessionProvider> {
    device: &'a D,
    session: Option<D::Session>,
    _lock: Option<MutexGuard<'a, ()>>,
}

impl<D: SessionProvider> SessionGuard<'_, D> {
    fn session_mut(&mut self) -> &mut D::Session {
        match self.session.as_mut() {
            Some(session) => session,
            None => unreachable!("device session is only released on drop"),
        }
    }
}

impl<D: SessionProvider> Drop for SessionGuard<'_, D> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            match self.device.finalize(session) {
                Ok(()) => debug!("Device session finalized"),
                Err(code) => warn!(
                    "Failed to {} device session: status {}",
                    SessionStage::Finalize,
                    code
                ),
            }
        }
    }
}
