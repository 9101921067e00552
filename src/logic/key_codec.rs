//! Conversion between the device's flat public key layout and `sm2::PublicKey`
//!
//! The device stores a public key as `X || Y`, two 32-byte big-endian integers.

use sm2::elliptic_curve::sec1::ToEncodedPoint;
use sm2::PublicKey;

use crate::error::CodecError;

pub const DEVICE_PUBLIC_KEY_LEN: usize = 64;

pub const COORDINATE_LEN: usize = DEVICE_PUBLIC_KEY_LEN / 2;

const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// Public key bytes as exchanged with the device
pub type DevicePublicKey = [u8; DEVICE_PUBLIC_KEY_LEN];

/// Decode device public key bytes into an SM2 public key.
///
/// The result is re-encoded and compared with the input, so a key that would
/// not reproduce the device's bytes is never handed out.
pub fn decode_device_public_key(bytes: &[u8]) -> Result<PublicKey, CodecError> {
    if bytes.len() != DEVICE_PUBLIC_KEY_LEN {
        return Err(CodecError::InvalidKeyLength {
            expected: DEVICE_PUBLIC_KEY_LEN,
            actual: bytes.len(),
        });
    }

    let (x, y) = bytes.split_at(COORDINATE_LEN);
    let public_key = public_key_from_coordinates(x, y)?;

    let reencoded = encode_standard_public_key(&public_key)?;
    ensure_round_trip(bytes, &reencoded)?;

    Ok(public_key)
}

fn ensure_round_trip(original: &[u8], reencoded: &DevicePublicKey) -> Result<(), CodecError> {
    if reencoded[..] != *original {
        return Err(CodecError::KeyRoundTripMismatch);
    }
    Ok(())
}

/// Encode an SM2 public key into the device layout.
///
/// Each coordinate is left-padded to exactly [`COORDINATE_LEN`] bytes.
pub fn encode_standard_public_key(public_key: &PublicKey) -> Result<DevicePublicKey, CodecError> {
    let point = public_key.to_encoded_point(false);
    let (x, y) = match (point.x(), point.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(CodecError::InvalidPoint),
    };

    let mut out = [0u8; DEVICE_PUBLIC_KEY_LEN];
    out[..COORDINATE_LEN].copy_from_slice(&pad_coordinate(&x[..])?);
    out[COORDINATE_LEN..].copy_from_slice(&pad_coordinate(&y[..])?);
    Ok(out)
}

/// Left-pad a big-endian unsigned integer to the fixed coordinate width.
pub fn pad_coordinate(be_bytes: &[u8]) -> Result<[u8; COORDINATE_LEN], CodecError> {
    if be_bytes.len() > COORDINATE_LEN {
        return Err(CodecError::CoordinateTooWide {
            max: COORDINATE_LEN,
            actual: be_bytes.len(),
        });
    }

    let mut out = [0u8; COORDINATE_LEN];
    out[COORDINATE_LEN - be_bytes.len()..].copy_from_slice(be_bytes);
    Ok(out)
}

fn public_key_from_coordinates(x: &[u8], y: &[u8]) -> Result<PublicKey, CodecError> {
    let mut sec1 = [0u8; 1 + DEVICE_PUBLIC_KEY_LEN];
    sec1[0] = SEC1_UNCOMPRESSED_TAG;
    sec1[1..1 + COORDINATE_LEN].copy_from_slice(&pad_coordinate(x)?);
    sec1[1 + COORDINATE_LEN..].copy_from_slice(&pad_coordinate(y)?);

    PublicKey::from_sec1_bytes(&sec1).map_err(|_| CodecError::InvalidPoint)
}
