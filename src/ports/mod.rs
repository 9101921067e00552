//! Ports (traits) for device operations
//!
//! These traits define the primitives the hardware security module exposes.
//! They represent ports in hexagonal architecture - the core depends on
//! these abstractions, not on the vendor library.

mod device;


pub use device::{Cipher, DeviceResult, KeyStore, SessionProvider, Signer};

/// Combined trait for all device primitives
///
/// A device adapter typically implements this.
pub trait Device: KeyStore + Signer + Cipher {}

// Blanket implementation for types that implement all capability traits
impl<T> Device for T where T: KeyStore + Signer + Cipher {}
