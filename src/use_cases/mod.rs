//! Use cases (orchestration)
//!
//! Each use case opens a session, performs exactly one device call with
//! buffers sized for it, translates the result code and converts the output.

mod encrypt;
mod manage_keys;
mod sign;
mod version;

pub use encrypt::{decrypt, encrypt};
pub use manage_keys::{delete_key, generate_key, get_public_key};
pub use sign::{sign, verify};
pub use version::get_version;

use crate::error::{HsmError, HsmResult};
use crate::logic::Operation;

/// The part of `buf` the device reports having written
fn reported(op: Operation, buf: &[u8], written: usize) -> HsmResult<&[u8]> {
    buf.get(..written).ok_or(HsmError::BufferOverflow {
        op,
        capacity: buf.len(),
        reported: written,
    })
}
