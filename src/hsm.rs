//! Operation facade
//!
//! `Hsm` bundles a device adapter with its session manager and exposes the
//! eight operations with standard key types on both sides.

use sm2::PublicKey;

use crate::config::HsmConfig;
use crate::error::HsmResult;
use crate::model::{DeviceConfig, Label, Pin, Signature};
use crate::ports::Device;
use crate::session::SessionManager;
use crate::use_cases;

/// Hardware security module front end
#[derive(Debug)]
pub struct Hsm<D> {
    sessions: SessionManager<D>,
}

impl<D: Device> Hsm<D> {
    /// Wrap `device` with the default configuration (serialized sessions)
    pub fn new(device: D) -> Self {
        Self::with_config(device, HsmConfig::default())
    }

    pub fn with_config(device: D, config: HsmConfig) -> Self {
        Self {
            sessions: SessionManager::new(device, config),
        }
    }

    pub fn device(&self) -> &D {
        self.sessions.device()
    }

    pub fn sessions(&self) -> &SessionManager<D> {
        &self.sessions
    }

    /// Device library version
    pub fn get_version(&self) -> HsmResult<u32> {
        use_cases::get_version(&self.sessions)
    }

    /// Create a key pair under `label` protected by `pin`; returns its public key
    pub fn generate_key(
        &self,
        config: &DeviceConfig,
        label: &Label,
        pin: &Pin,
    ) -> HsmResult<PublicKey> {
        use_cases::generate_key(&self.sessions, config, label, pin)
    }

    pub fn delete_key(&self, config: &DeviceConfig, label: &Label) -> HsmResult<()> {
        use_cases::delete_key(&self.sessions, config, label)
    }

    pub fn get_public_key(&self, config: &DeviceConfig, label: &Label) -> HsmResult<PublicKey> {
        use_cases::get_public_key(&self.sessions, config, label)
    }

    pub fn sign(
        &self,
        config: &DeviceConfig,
        label: &Label,
        pin: &Pin,
        message: &[u8],
    ) -> HsmResult<Signature> {
        use_cases::sign(&self.sessions, config, label, pin, message)
    }

    /// `Ok(false)` when the signature does not match; `Err` only for device or input failures
    pub fn verify(
        &self,
        config: &DeviceConfig,
        message: &[u8],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> HsmResult<bool> {
        use_cases::verify(&self.sessions, config, message, signature, public_key)
    }

    pub fn asymmetric_encrypt(
        &self,
        config: &DeviceConfig,
        plaintext: &[u8],
        public_key: &PublicKey,
    ) -> HsmResult<Vec<u8>> {
        use_cases::encrypt(&self.sessions, config, plaintext, public_key)
    }

    pub fn asymmetric_decrypt(
        &self,
        config: &DeviceConfig,
        label: &Label,
        pin: &Pin,
        ciphertext: &[u8],
    ) -> HsmResult<Vec<u8>> {
        use_cases::decrypt(&self.sessions, config, label, pin, ciphertext)
    }
}
