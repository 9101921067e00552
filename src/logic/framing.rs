//! Ciphertext length framing for SM2 public key encryption
//!
//! Ciphertexts are laid out as `04 || C1.X || C1.Y || C3 || C2`: the
//! uncompressed point tag, the ephemeral point, the SM3 hash, then the
//! masked message. Encrypt and decrypt both size buffers with this layout.

use crate::error::CodecError;

pub const POINT_TAG_LEN: usize = 1;

pub const EPHEMERAL_POINT_LEN: usize = 64;

pub const HASH_LEN: usize = 32;

/// Bytes a ciphertext carries on top of its plaintext
pub const CIPHERTEXT_OVERHEAD: usize = POINT_TAG_LEN + EPHEMERAL_POINT_LEN + HASH_LEN;

pub fn cipher_len_from_plain(plain_len: usize) -> Result<usize, CodecError> {
    plain_len
        .checked_add(CIPHERTEXT_OVERHEAD)
        .ok_or(CodecError::InvalidCipherLength {
            len: plain_len,
            overhead: CIPHERTEXT_OVERHEAD,
        })
}

pub fn plain_len_from_cipher(cipher_len: usize) -> Result<usize, CodecError> {
    cipher_len
        .checked_sub(CIPHERTEXT_OVERHEAD)
        .ok_or(CodecError::InvalidCipherLength {
            len: cipher_len,
            overhead: CIPHERTEXT_OVERHEAD,
        })
}
