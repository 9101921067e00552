//! In-memory device for tests
//!
//! Keys and signatures are real SM2 (via the `sm2` crate). Encryption is a
//! stand-in with the same `04 || C1 || C3 || C2` framing: C1 is the
//! recipient key, C3 an SM3 hash and C2 the message masked with an SM3
//! keystream. It has no confidentiality and exists only so the framing and
//! session plumbing can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand_core::OsRng;
use sm2::dsa::signature::{Signer as _, Verifier as _};
use sm2::dsa::{Signature as Sm2Signature, SigningKey, VerifyingKey};
use sm2::SecretKey;
use sm3::{Digest, Sm3};

use crate::logic::{
    decode_device_public_key, encode_standard_public_key, DevicePublicKey, StatusCode,
    CIPHERTEXT_OVERHEAD, DEVICE_PUBLIC_KEY_LEN, EPHEMERAL_POINT_LEN, POINT_TAG_LEN,
};
use crate::model::{DeviceConfig, Label, Pin};
use crate::ports::{Cipher, DeviceResult, KeyStore, SessionProvider, Signer};

/// Default SM2 distinguishing identifier
const DIST_ID: &str = "1234567812345678";

const POINT_TAG: u8 = 0x04;

const HASH_START: usize = POINT_TAG_LEN + EPHEMERAL_POINT_LEN;

pub const INTERNAL_ERROR: StatusCode = StatusCode::new(0x0100_0001);
pub const INVALID_SESSION: StatusCode = StatusCode::new(0x0100_0006);
pub const BUFFER_TOO_SMALL: StatusCode = StatusCode::new(0x0100_0010);
pub const KEY_NOT_FOUND: StatusCode = StatusCode::new(0x0100_0011);
pub const KEY_EXISTS: StatusCode = StatusCode::new(0x0100_0012);
pub const INVALID_INPUT: StatusCode = StatusCode::new(0x0100_001D);
pub const DECRYPT_FAILED: StatusCode = StatusCode::new(0x0100_0022);
pub const WRONG_PIN: StatusCode = StatusCode::new(0x0100_0024);

/// Primitive a fault can be injected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeCall {
    Initialize,
    Finalize,
    GetVersion,
    GenerateKey,
    DeleteKey,
    GetPublicKey,
    Sign,
    Verify,
    Encrypt,
    Decrypt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub initialized: usize,
    pub finalized: usize,
    pub open: usize,
    pub max_open: usize,
}

#[derive(Debug)]
pub struct FakeSession {
    id: u64,
}

struct StoredKey {
    secret: SecretKey,
    pin: Vec<u8>,
}

#[derive(Default)]
struct FakeState {
    keys: HashMap<Label, StoredKey>,
    open_sessions: HashSet<u64>,
    next_session: u64,
    stats: SessionStats,
    faults: HashMap<FakeCall, StatusCode>,
    reported_key_len: Option<usize>,
    reported_signature_len: Option<usize>,
    reported_cipher_len: Option<usize>,
}

impl FakeState {
    fn take_fault(&mut self, call: FakeCall) -> DeviceResult<()> {
        match self.faults.remove(&call) {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn check_session(&self, session: &FakeSession) -> DeviceResult<()> {
        if self.open_sessions.contains(&session.id) {
            Ok(())
        } else {
            Err(INVALID_SESSION)
        }
    }

    fn key(&self, label: &Label) -> DeviceResult<&StoredKey> {
        self.keys.get(label).ok_or(KEY_NOT_FOUND)
    }

    fn unlocked_key(&self, label: &Label, pin: &Pin) -> DeviceResult<&StoredKey> {
        let key = self.key(label)?;
        if key.pin != pin.as_bytes() {
            return Err(WRONG_PIN);
        }
        Ok(key)
    }

    fn write_public_key(
        &self,
        key: &StoredKey,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize> {
        *public_key =
            encode_standard_public_key(&key.secret.public_key()).map_err(|_| INTERNAL_ERROR)?;
        Ok(self.reported_key_len.unwrap_or(DEVICE_PUBLIC_KEY_LEN))
    }
}

pub struct FakeDevice {
    version: u32,
    state: Mutex<FakeState>,
}

impl FakeDevice {
    pub const VERSION: u32 = 0x0002_0001;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Make the next call of `call` fail with `code`
    pub fn fail_next(&self, call: FakeCall, code: StatusCode) {
        self.state().faults.insert(call, code);
    }

    /// Report `len` public key bytes instead of the real length
    pub fn report_key_len(&self, len: usize) {
        self.state().reported_key_len = Some(len);
    }

    /// Report `len` signature bytes instead of the real length
    pub fn report_signature_len(&self, len: usize) {
        self.state().reported_signature_len = Some(len);
    }

    /// Report `len` bytes from encrypt and decrypt instead of the real length
    pub fn report_cipher_len(&self, len: usize) {
        self.state().reported_cipher_len = Some(len);
    }

    pub fn stats(&self) -> SessionStats {
        self.state().stats
    }

    pub fn has_key(&self, label: &Label) -> bool {
        self.state().keys.contains_key(label)
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for FakeDevice {
    type Session = FakeSession;

    fn version(&self) -> DeviceResult<u32> {
        self.state().take_fault(FakeCall::GetVersion)?;
        Ok(self.version)
    }

    fn initialize(&self, _config: &DeviceConfig) -> DeviceResult<FakeSession> {
        let mut state = self.state();
        state.take_fault(FakeCall::Initialize)?;

        let id = state.next_session;
        state.next_session += 1;
        state.open_sessions.insert(id);

        let open = state.open_sessions.len();
        state.stats.initialized += 1;
        state.stats.open = open;
        state.stats.max_open = state.stats.max_open.max(open);
        Ok(FakeSession { id })
    }

    fn finalize(&self, session: FakeSession) -> DeviceResult<()> {
        let mut state = self.state();
        let fault = state.take_fault(FakeCall::Finalize);

        if !state.open_sessions.remove(&session.id) {
            return Err(INVALID_SESSION);
        }
        state.stats.finalized += 1;
        state.stats.open = state.open_sessions.len();
        fault
    }
}

impl KeyStore for FakeDevice {
    fn generate_key(
        &self,
        session: &mut FakeSession,
        label: &Label,
        pin: &Pin,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize> {
        let mut state = self.state();
        state.take_fault(FakeCall::GenerateKey)?;
        state.check_session(session)?;

        if state.keys.contains_key(label) {
            return Err(KEY_EXISTS);
        }

        let key = StoredKey {
            secret: SecretKey::random(&mut OsRng),
            pin: pin.as_bytes().to_vec(),
        };
        let written = state.write_public_key(&key, public_key)?;
        state.keys.insert(label.clone(), key);
        Ok(written)
    }

    fn delete_key(&self, session: &mut FakeSession, label: &Label) -> DeviceResult<()> {
        let mut state = self.state();
        state.take_fault(FakeCall::DeleteKey)?;
        state.check_session(session)?;

        state.keys.remove(label).map(|_| ()).ok_or(KEY_NOT_FOUND)
    }

    fn public_key(
        &self,
        session: &mut FakeSession,
        label: &Label,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize> {
        let mut state = self.state();
        state.take_fault(FakeCall::GetPublicKey)?;
        state.check_session(session)?;

        let key = state.key(label)?;
        state.write_public_key(key, public_key)
    }
}

impl Signer for FakeDevice {
    fn sign(
        &self,
        session: &mut FakeSession,
        label: &Label,
        pin: &Pin,
        message: &[u8],
        signature: &mut [u8],
    ) -> DeviceResult<usize> {
        let mut state = self.state();
        state.take_fault(FakeCall::Sign)?;
        state.check_session(session)?;

        let key = state.unlocked_key(label, pin)?;
        let signing_key = SigningKey::new(DIST_ID, &key.secret).map_err(|_| INTERNAL_ERROR)?;
        let produced: Sm2Signature = signing_key.sign(message);
        let bytes = produced.to_bytes();

        if signature.len() < bytes.len() {
            return Err(BUFFER_TOO_SMALL);
        }
        signature[..bytes.len()].copy_from_slice(&bytes);
        Ok(state.reported_signature_len.unwrap_or(bytes.len()))
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &DevicePublicKey,
        signature: &[u8],
    ) -> DeviceResult<()> {
        self.state().take_fault(FakeCall::Verify)?;

        let public_key = decode_device_public_key(public_key).map_err(|_| INVALID_INPUT)?;
        let verifying_key = VerifyingKey::new(DIST_ID, public_key).map_err(|_| INTERNAL_ERROR)?;
        let signature =
            Sm2Signature::try_from(signature).map_err(|_| StatusCode::VERIFY_FAILED)?;

        verifying_key
            .verify(message, &signature)
            .map_err(|_| StatusCode::VERIFY_FAILED)
    }
}

impl Cipher for FakeDevice {
    fn encrypt(
        &self,
        public_key: &DevicePublicKey,
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> DeviceResult<usize> {
        let reported_len = {
            let mut state = self.state();
            state.take_fault(FakeCall::Encrypt)?;
            state.reported_cipher_len
        };
        decode_device_public_key(public_key).map_err(|_| INVALID_INPUT)?;

        let total = plaintext.len() + CIPHERTEXT_OVERHEAD;
        if ciphertext.len() < total {
            return Err(BUFFER_TOO_SMALL);
        }

        ciphertext[0] = POINT_TAG;
        ciphertext[POINT_TAG_LEN..HASH_START].copy_from_slice(public_key);
        ciphertext[HASH_START..CIPHERTEXT_OVERHEAD].copy_from_slice(&digest(public_key, plaintext));

        let body = &mut ciphertext[CIPHERTEXT_OVERHEAD..total];
        body.copy_from_slice(plaintext);
        apply_keystream(public_key, body);
        Ok(reported_len.unwrap_or(total))
    }

    fn decrypt(
        &self,
        session: &mut FakeSession,
        label: &Label,
        pin: &Pin,
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> DeviceResult<usize> {
        let mut state = self.state();
        state.take_fault(FakeCall::Decrypt)?;
        state.check_session(session)?;

        let key = state.unlocked_key(label, pin)?;
        let public_key =
            encode_standard_public_key(&key.secret.public_key()).map_err(|_| INTERNAL_ERROR)?;

        if ciphertext.len() < CIPHERTEXT_OVERHEAD {
            return Err(INVALID_INPUT);
        }
        if ciphertext[0] != POINT_TAG || ciphertext[POINT_TAG_LEN..HASH_START] != public_key {
            return Err(DECRYPT_FAILED);
        }

        let body = &ciphertext[CIPHERTEXT_OVERHEAD..];
        if plaintext.len() < body.len() {
            return Err(BUFFER_TOO_SMALL);
        }

        let out = &mut plaintext[..body.len()];
        out.copy_from_slice(body);
        apply_keystream(&public_key, out);

        if digest(&public_key, out)[..] != ciphertext[HASH_START..CIPHERTEXT_OVERHEAD] {
            out.fill(0);
            return Err(DECRYPT_FAILED);
        }
        Ok(state.reported_cipher_len.unwrap_or(body.len()))
    }
}

fn digest(public_key: &DevicePublicKey, message: &[u8]) -> [u8; 32] {
    Sm3::new()
        .chain_update(public_key)
        .chain_update(message)
        .finalize()
        .into()
}

fn apply_keystream(public_key: &DevicePublicKey, data: &mut [u8]) {
    for (counter, chunk) in data.chunks_mut(32).enumerate() {
        let block = Sm3::new()
            .chain_update(public_key)
            .chain_update((counter as u32).to_be_bytes())
            .finalize();
        for (byte, mask) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::device_contract;

    contract_tests_for!(
        fake_device_contract,
        make = FakeDevice::new,
        tests = {
            test_initialize_finalize => device_contract::test_initialize_finalize,
            test_version => device_contract::test_version,
            test_generated_key_is_valid_sm2_point => device_contract::test_generated_key_is_valid_sm2_point,
            test_public_key_matches_generated => device_contract::test_public_key_matches_generated,
            test_deleted_key_is_gone => device_contract::test_deleted_key_is_gone,
            test_sign_then_verify => device_contract::test_sign_then_verify,
            test_sign_wrong_pin => device_contract::test_sign_wrong_pin,
            test_encrypt_then_decrypt => device_contract::test_encrypt_then_decrypt,
        }
    );

    #[test]
    fn test_finalized_session_is_invalid() {
        let device = FakeDevice::new();
        let mut session = device.initialize(&DeviceConfig::new("cfg").unwrap()).unwrap();
        let stale = FakeSession { id: session.id };
        device.finalize(FakeSession { id: session.id }).unwrap();

        let label = Label::new("alice").unwrap();
        assert_eq!(device.delete_key(&mut session, &label), Err(INVALID_SESSION));
        assert_eq!(device.finalize(stale), Err(INVALID_SESSION));
    }

    #[test]
    fn test_fault_is_one_shot() {
        let device = FakeDevice::new();
        device.fail_next(FakeCall::GetVersion, INTERNAL_ERROR);

        assert_eq!(device.version(), Err(INTERNAL_ERROR));
        assert_eq!(device.version(), Ok(FakeDevice::VERSION));
    }

    #[test]
    fn test_decrypt_with_other_key_fails() {
        let device = FakeDevice::new();
        let mut session = device.initialize(&DeviceConfig::new("cfg").unwrap()).unwrap();
        let pin = Pin::new("1234").unwrap();
        let alice = Label::new("alice").unwrap();
        let bob = Label::new("bob").unwrap();

        let mut alice_key = [0u8; DEVICE_PUBLIC_KEY_LEN];
        device
            .generate_key(&mut session, &alice, &pin, &mut alice_key)
            .unwrap();
        let mut bob_key = [0u8; DEVICE_PUBLIC_KEY_LEN];
        device
            .generate_key(&mut session, &bob, &pin, &mut bob_key)
            .unwrap();

        let mut ciphertext = vec![0u8; 5 + CIPHERTEXT_OVERHEAD];
        device.encrypt(&alice_key, b"hello", &mut ciphertext).unwrap();

        let mut plaintext = [0u8; 5];
        assert_eq!(
            device.decrypt(&mut session, &bob, &pin, &ciphertext, &mut plaintext),
            Err(DECRYPT_FAILED)
        );
        device.finalize(session).unwrap();
    }
}
