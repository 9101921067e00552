//! SM2 signing, verification and encryption backed by a hardware security module
//!
//! Keys never leave the device. Public keys cross the boundary as
//! [`sm2::PublicKey`]; the device-native 64-byte `X || Y` form stays inside
//! the crate.

mod adapters;
#[cfg(feature = "xsign")]
pub mod api;
pub mod config;
pub mod error;
mod hsm;
mod logic;
pub mod model;
pub mod ports;
mod session;
pub mod use_cases;

// Re-export commonly used types
pub use config::{HsmConfig, SessionPolicy};
pub use error::{CodecError, DomainError, HsmError, HsmResult, SessionStage};
pub use hsm::Hsm;
pub use logic::{
    cipher_len_from_plain, decode_device_public_key, encode_standard_public_key, pad_coordinate,
    plain_len_from_cipher, DevicePublicKey, Operation, Outcome, StatusCode, CIPHERTEXT_OVERHEAD,
    COORDINATE_LEN, DEVICE_PUBLIC_KEY_LEN, EPHEMERAL_POINT_LEN, HASH_LEN, POINT_TAG_LEN,
};
pub use model::{DeviceConfig, Label, Pin, Signature};
pub use session::SessionManager;

#[cfg(feature = "xsign")]
pub use adapters::{XSignDevice, XSignSession};

pub use sm2;
