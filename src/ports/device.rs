//! Device capability traits
//!
//! Each method maps to exactly one primitive of the device library. Outputs
//! are written into caller-sized buffers and the number of bytes the device
//! reports is returned.

use crate::logic::{DevicePublicKey, StatusCode};
use crate::model::{DeviceConfig, Label, Pin};

/// Result of a single device primitive; the error is the raw non-success code
pub type DeviceResult<T> = Result<T, StatusCode>;

/// Capability to open and close device sessions
pub trait SessionProvider {
    /// Open device context. Moved into [`SessionProvider::finalize`], so it
    /// cannot be used after release.
    type Session;

    /// Query the device library version. Needs no session.
    fn version(&self) -> DeviceResult<u32>;

    /// Open a session with the configuration string passed verbatim
    fn initialize(&self, config: &DeviceConfig) -> DeviceResult<Self::Session>;

    /// Close a session
    fn finalize(&self, session: Self::Session) -> DeviceResult<()>;
}

/// Capability to manage device-resident key pairs
pub trait KeyStore: SessionProvider {
    /// Generate a key pair under `label`, protected by `pin`
    ///
    /// # Returns
    ///
    /// The number of public key bytes written
    fn generate_key(
        &self,
        session: &mut Self::Session,
        label: &Label,
        pin: &Pin,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize>;

    /// Remove the key pair stored under `label`
    fn delete_key(&self, session: &mut Self::Session, label: &Label) -> DeviceResult<()>;

    /// Fetch the public half of the key pair stored under `label`
    fn public_key(
        &self,
        session: &mut Self::Session,
        label: &Label,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize>;
}

/// Capability to sign and verify
pub trait Signer: SessionProvider {
    /// Sign `message` with the private key under `label`
    ///
    /// # Returns
    ///
    /// The number of signature bytes written
    fn sign(
        &self,
        session: &mut Self::Session,
        label: &Label,
        pin: &Pin,
        message: &[u8],
        signature: &mut [u8],
    ) -> DeviceResult<usize>;

    /// Verify a signature with an explicit public key. Needs no session.
    ///
    /// # Errors
    ///
    /// [`StatusCode::VERIFY_FAILED`] when the signature does not match
    fn verify(
        &self,
        message: &[u8],
        public_key: &DevicePublicKey,
        signature: &[u8],
    ) -> DeviceResult<()>;
}

/// Capability to encrypt and decrypt
pub trait Cipher: SessionProvider {
    /// Encrypt to an explicit public key. Needs no session.
    fn encrypt(
        &self,
        public_key: &DevicePublicKey,
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> DeviceResult<usize>;

    /// Decrypt with the private key under `label`
    fn decrypt(
        &self,
        session: &mut Self::Session,
        label: &Label,
        pin: &Pin,
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> DeviceResult<usize>;
}
