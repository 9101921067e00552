//! Signing and verification use cases

use sm2::PublicKey;
use tracing::{debug, info};

use crate::error::{HsmError, HsmResult};
use crate::logic::{check, check_verify, encode_standard_public_key, Operation};
use crate::model::{DeviceConfig, Label, Pin, Signature};
use crate::ports::Signer;
use crate::session::SessionManager;

use super::reported;

/// Sign `message` with the device-resident key under `label`
///
/// # Errors
///
/// Returns errors if:
/// - `message` is empty
/// - The session cannot be opened
/// - The device rejects the request (unknown label, wrong PIN)
pub fn sign<D: Signer>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    label: &Label,
    pin: &Pin,
    message: &[u8],
) -> HsmResult<Signature> {
    if message.is_empty() {
        return Err(HsmError::EmptyInput { what: "message" });
    }

    debug!("Signing {} bytes with key {}", message.len(), label);

    let signature = sessions.with_session(config, |device, session| {
        let mut buf = [0u8; Signature::MAX_LENGTH];
        let written = check(
            Operation::Sign,
            sessions.timed(Operation::Sign, || {
                device.sign(session, label, pin, message, &mut buf)
            }),
        )?;
        let bytes = reported(Operation::Sign, &buf, written)?;
        Ok(Signature::from_bytes(bytes)?)
    })?;

    info!("Message signed with key {}", label);
    Ok(signature)
}

/// Verify `signature` over `message` against `public_key`
///
/// A signature that does not match is `Ok(false)`. An error means the
/// device could not evaluate the signature at all.
pub fn verify<D: Signer>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> HsmResult<bool> {
    if message.is_empty() {
        return Err(HsmError::EmptyInput { what: "message" });
    }

    let device_key = encode_standard_public_key(public_key)?;
    debug!(
        "Verifying {} byte signature over {} bytes",
        signature.len(),
        message.len()
    );

    let valid = sessions.with_session(config, |device, _session| {
        check_verify(sessions.timed(Operation::Verify, || {
            device.verify(message, &device_key, signature.as_bytes())
        }))
    })?;

    if valid {
        info!("Signature verified");
    } else {
        info!("Signature rejected");
    }
    Ok(valid)
}
