//! Key management use cases
//!
//! Generate, delete and fetch device-resident key pairs. Public keys leave
//! the device in its flat layout and are decoded before they are returned.

use sm2::PublicKey;
use tracing::{debug, info};

use crate::error::HsmResult;
use crate::logic::{check, decode_device_public_key, Operation, DEVICE_PUBLIC_KEY_LEN};
use crate::model::{DeviceConfig, Label, Pin};
use crate::ports::KeyStore;
use crate::session::SessionManager;

use super::reported;

/// Generate a new SM2 key pair inside the device
///
/// # Returns
///
/// The public half, decoded and round-trip checked
///
/// # Errors
///
/// Returns errors if:
/// - The session cannot be opened
/// - The device rejects the request (e.g. the label is taken)
/// - The returned public key is malformed
pub fn generate_key<D: KeyStore>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    label: &Label,
    pin: &Pin,
) -> HsmResult<PublicKey> {
    debug!("Generating key {}", label);

    let public_key = sessions.with_session(config, |device, session| {
        let mut buf = [0u8; DEVICE_PUBLIC_KEY_LEN];
        let written = check(
            Operation::GenerateKey,
            sessions.timed(Operation::GenerateKey, || {
                device.generate_key(session, label, pin, &mut buf)
            }),
        )?;
        let bytes = reported(Operation::GenerateKey, &buf, written)?;
        Ok(decode_device_public_key(bytes)?)
    })?;

    info!("Key {} generated", label);
    Ok(public_key)
}

/// Remove a key pair from the device
pub fn delete_key<D: KeyStore>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    label: &Label,
) -> HsmResult<()> {
    debug!("Deleting key {}", label);

    sessions.with_session(config, |device, session| {
        check(
            Operation::DeleteKey,
            sessions.timed(Operation::DeleteKey, || device.delete_key(session, label)),
        )
    })?;

    info!("Key {} deleted", label);
    Ok(())
}

/// Fetch the public half of an existing key pair
pub fn get_public_key<D: KeyStore>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    label: &Label,
) -> HsmResult<PublicKey> {
    debug!("Fetching public key {}", label);

    let public_key = sessions.with_session(config, |device, session| {
        let mut buf = [0u8; DEVICE_PUBLIC_KEY_LEN];
        let written = check(
            Operation::GetPublicKey,
            sessions.timed(Operation::GetPublicKey, || {
                device.public_key(session, label, &mut buf)
            }),
        )?;
        let bytes = reported(Operation::GetPublicKey, &buf, written)?;
        Ok(decode_device_public_key(bytes)?)
    })?;

    info!("Public key {} fetched", label);
    Ok(public_key)
}
