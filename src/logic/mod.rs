//! Pure conversions between device representations and the rest of the crate

mod framing;
mod key_codec;
mod status;

pub use framing::{
    cipher_len_from_plain, plain_len_from_cipher, CIPHERTEXT_OVERHEAD, EPHEMERAL_POINT_LEN,
    HASH_LEN, POINT_TAG_LEN,
};
pub use key_codec::{
    decode_device_public_key, encode_standard_public_key, pad_coordinate, DevicePublicKey,
    COORDINATE_LEN, DEVICE_PUBLIC_KEY_LEN,
};
pub use status::{check, check_verify, Operation, Outcome, StatusCode};
