//! Process-wide entry points bound to the XSign device
//!
//! String arguments are validated into the model types before any device
//! call. All callers share one facade, and with it one session lock.

use std::sync::OnceLock;

use sm2::PublicKey;

use crate::adapters::XSignDevice;
use crate::error::HsmResult;
use crate::hsm::Hsm;
use crate::model::{DeviceConfig, Label, Pin, Signature};

static HSM: OnceLock<Hsm<XSignDevice>> = OnceLock::new();

fn hsm() -> &'static Hsm<XSignDevice> {
    HSM.get_or_init(|| Hsm::new(XSignDevice))
}

pub fn get_version() -> HsmResult<u32> {
    hsm().get_version()
}

pub fn generate_key(config: &str, label: &str, pin: &str) -> HsmResult<PublicKey> {
    let (config, label, pin) = (DeviceConfig::new(config)?, Label::new(label)?, Pin::new(pin)?);
    hsm().generate_key(&config, &label, &pin)
}

pub fn delete_key(config: &str, label: &str) -> HsmResult<()> {
    hsm().delete_key(&DeviceConfig::new(config)?, &Label::new(label)?)
}

pub fn get_public_key(config: &str, label: &str) -> HsmResult<PublicKey> {
    hsm().get_public_key(&DeviceConfig::new(config)?, &Label::new(label)?)
}

pub fn sign(config: &str, label: &str, pin: &str, message: &[u8]) -> HsmResult<Signature> {
    let (config, label, pin) = (DeviceConfig::new(config)?, Label::new(label)?, Pin::new(pin)?);
    hsm().sign(&config, &label, &pin, message)
}

/// Verify raw signature bytes; `Ok(false)` when they do not match
pub fn verify(
    config: &str,
    message: &[u8],
    signature: &[u8],
    public_key: &PublicKey,
) -> HsmResult<bool> {
    let signature = Signature::from_bytes(signature)?;
    hsm().verify(&DeviceConfig::new(config)?, message, &signature, public_key)
}

pub fn asymmetric_encrypt(
    config: &str,
    plaintext: &[u8],
    public_key: &PublicKey,
) -> HsmResult<Vec<u8>> {
    hsm().asymmetric_encrypt(&DeviceConfig::new(config)?, plaintext, public_key)
}

pub fn asymmetric_decrypt(
    config: &str,
    label: &str,
    pin: &str,
    ciphertext: &[u8],
) -> HsmResult<Vec<u8>> {
    let (config, label, pin) = (DeviceConfig::new(config)?, Label::new(label)?, Pin::new(pin)?);
    hsm().asymmetric_decrypt(&config, &label, &pin, ciphertext)
}
