//! Asymmetric encryption use cases
//!
//! Buffers are sized from the fixed ciphertext overhead in both directions.

use sm2::PublicKey;
use tracing::{debug, info, warn};

use crate::error::{HsmError, HsmResult};
use crate::logic::{
    check, cipher_len_from_plain, encode_standard_public_key, plain_len_from_cipher, Operation,
};
use crate::model::{DeviceConfig, Label, Pin};
use crate::ports::Cipher;
use crate::session::SessionManager;

use super::reported;

/// Encrypt `plaintext` to `public_key`
///
/// The primitive needs no key store access; the session only carries `config`.
pub fn encrypt<D: Cipher>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    plaintext: &[u8],
    public_key: &PublicKey,
) -> HsmResult<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(HsmError::EmptyInput { what: "plaintext" });
    }

    let device_key = encode_standard_public_key(public_key)?;
    let expected = cipher_len_from_plain(plaintext.len())?;
    let mut ciphertext = vec![0u8; expected];
    debug!(
        "Encrypting {} bytes into a {} byte buffer",
        plaintext.len(),
        ciphertext.len()
    );

    let written = sessions.with_session(config, |device, _session| {
        let written = check(
            Operation::Encrypt,
            sessions.timed(Operation::Encrypt, || {
                device.encrypt(&device_key, plaintext, &mut ciphertext)
            }),
        )?;
        Ok(reported(Operation::Encrypt, &ciphertext, written)?.len())
    })?;

    ensure_framed(Operation::Encrypt, expected, written)?;
    info!("Encrypted {} bytes", plaintext.len());
    Ok(ciphertext)
}

/// Decrypt `ciphertext` with the device-resident key under `label`
///
/// # Errors
///
/// Returns errors if:
/// - `ciphertext` is shorter than the fixed overhead
/// - The session cannot be opened
/// - The device rejects the request (unknown label, wrong PIN, corrupt ciphertext)
pub fn decrypt<D: Cipher>(
    sessions: &SessionManager<D>,
    config: &DeviceConfig,
    label: &Label,
    pin: &Pin,
    ciphertext: &[u8],
) -> HsmResult<Vec<u8>> {
    let expected = plain_len_from_cipher(ciphertext.len())?;
    let mut plaintext = vec![0u8; expected];
    debug!(
        "Decrypting {} bytes with key {}",
        ciphertext.len(),
        label
    );

    let written = sessions.with_session(config, |device, session| {
        let written = check(
            Operation::Decrypt,
            sessions.timed(Operation::Decrypt, || {
                device.decrypt(session, label, pin, ciphertext, &mut plaintext)
            }),
        )?;
        Ok(reported(Operation::Decrypt, &plaintext, written)?.len())
    })?;

    ensure_framed(Operation::Decrypt, expected, written)?;
    info!("Decrypted {} bytes with key {}", written, label);
    Ok(plaintext)
}

/// The reported output length must match the fixed framing exactly
fn ensure_framed(op: Operation, expected: usize, written: usize) -> HsmResult<()> {
    if written != expected {
        warn!("Device {} reported {} bytes, expected {}", op, written, expected);
        return Err(HsmError::LengthMismatch {
            op,
            expected,
            reported: written,
        });
    }
    Ok(())
}
