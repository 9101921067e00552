//! XSign implementation of the device ports
//!
//! Binds the vendor `libxsign` C library. Only compiled with the `xsign`
//! feature; set `XSIGN_LIB_DIR` when the library is not on the default
//! linker search path.

use std::ffi::{c_char, c_void};
use std::ptr;

use tracing::{debug, info};

use crate::logic::{DevicePublicKey, StatusCode, DEVICE_PUBLIC_KEY_LEN};
use crate::model::{DeviceConfig, Label, Pin};
use crate::ports::{Cipher, DeviceResult, KeyStore, SessionProvider, Signer};

type Handle = *mut c_void;

#[link(name = "xsign")]
extern "C" {
    fn X_Initialize(config: *const c_char, handle: *mut Handle) -> u32;
    fn X_Finalize(handle: Handle);
    fn X_GetVersion(version: *mut u32) -> u32;
    fn X_GenKey(
        handle: Handle,
        label: *const c_char,
        pin: *const c_char,
        public_key: *mut u8,
        public_key_len: *mut u32,
    ) -> u32;
    fn X_DelKey(handle: Handle, label: *const c_char) -> u32;
    fn X_GetPublicKey(
        handle: Handle,
        label: *const c_char,
        public_key: *mut u8,
        public_key_len: *mut u32,
    ) -> u32;
    fn X_Sign(
        handle: Handle,
        label: *const c_char,
        pin: *const c_char,
        data: *const u8,
        data_len: u32,
        signature: *mut u8,
        signature_len: *mut u32,
    ) -> u32;
    fn X_Verify(
        data: *const u8,
        data_len: u32,
        public_key: *const u8,
        public_key_len: u32,
        signature: *const u8,
        signature_len: u32,
    ) -> u32;
    fn X_AsymmEncrypt(
        public_key: *const u8,
        public_key_len: u32,
        plaintext: *const u8,
        plaintext_len: u32,
        ciphertext: *mut u8,
        ciphertext_len: *mut u32,
    ) -> u32;
    fn X_AsymmDecrypt(
        handle: Handle,
        label: *const c_char,
        pin: *const c_char,
        ciphertext: *const u8,
        ciphertext_len: u32,
        plaintext: *mut u8,
        plaintext_len: *mut u32,
    ) -> u32;
}

/// Reported when a buffer length does not fit the library's 32-bit length type.
/// The library itself never returns this value.
pub const LENGTH_OVERFLOW: StatusCode = StatusCode::new(0xFFFF_FFFF);

fn c_len(len: usize) -> DeviceResult<u32> {
    u32::try_from(len).map_err(|_| LENGTH_OVERFLOW)
}

/// Handle to the process-wide XSign library
#[derive(Debug, Clone, Copy, Default)]
pub struct XSignDevice;

/// Open XSign context
#[derive(Debug)]
pub struct XSignSession {
    handle: Handle,
}

impl SessionProvider for XSignDevice {
    type Session = XSignSession;

    fn version(&self) -> DeviceResult<u32> {
        let mut version = 0u32;
        // SAFETY: `version` is a valid out pointer for the duration of the call.
        StatusCode::new(unsafe { X_GetVersion(&mut version) }).into_result()?;
        info!("XSign library version {:#X}", version);
        Ok(version)
    }

    fn initialize(&self, config: &DeviceConfig) -> DeviceResult<XSignSession> {
        let mut handle: Handle = ptr::null_mut();
        // SAFETY: `config` is NUL-terminated and outlives the call; `handle` is a valid out pointer.
        StatusCode::new(unsafe { X_Initialize(config.as_c_str().as_ptr(), &mut handle) })
            .into_result()?;
        debug!("XSign session opened");
        Ok(XSignSession { handle })
    }

    fn finalize(&self, session: XSignSession) -> DeviceResult<()> {
        // SAFETY: the handle came from X_Initialize and is consumed here, so it
        // is finalized exactly once.
        unsafe { X_Finalize(session.handle) };
        debug!("XSign session closed");
        Ok(())
    }
}

impl KeyStore for XSignDevice {
    fn generate_key(
        &self,
        session: &mut XSignSession,
        label: &Label,
        pin: &Pin,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize> {
        let mut len = c_len(DEVICE_PUBLIC_KEY_LEN)?;
        // SAFETY: strings are NUL-terminated; `public_key` holds `len` writable bytes.
        let code = unsafe {
            X_GenKey(
                session.handle,
                label.as_c_str().as_ptr(),
                pin.as_c_str().as_ptr(),
                public_key.as_mut_ptr(),
                &mut len,
            )
        };
        StatusCode::new(code).into_result()?;
        Ok(len as usize)
    }

    fn delete_key(&self, session: &mut XSignSession, label: &Label) -> DeviceResult<()> {
        // SAFETY: `label` is NUL-terminated and outlives the call.
        let code = unsafe { X_DelKey(session.handle, label.as_c_str().as_ptr()) };
        StatusCode::new(code).into_result()
    }

    fn public_key(
        &self,
        session: &mut XSignSession,
        label: &Label,
        public_key: &mut DevicePublicKey,
    ) -> DeviceResult<usize> {
        let mut len = c_len(DEVICE_PUBLIC_KEY_LEN)?;
        // SAFETY: `label` is NUL-terminated; `public_key` holds `len` writable bytes.
        let code = unsafe {
            X_GetPublicKey(
                session.handle,
                label.as_c_str().as_ptr(),
                public_key.as_mut_ptr(),
                &mut len,
            )
        };
        StatusCode::new(code).into_result()?;
        Ok(len as usize)
    }
}

impl Signer for XSignDevice {
    fn sign(
        &self,
        session: &mut XSignSession,
        label: &Label,
        pin: &Pin,
        message: &[u8],
        signature: &mut [u8],
    ) -> DeviceResult<usize> {
        let message_len = c_len(message.len())?;
        let mut len = c_len(signature.len())?;
        // SAFETY: strings are NUL-terminated; `message` is readable for
        // `message_len` bytes and `signature` writable for `len` bytes.
        let code = unsafe {
            X_Sign(
                session.handle,
                label.as_c_str().as_ptr(),
                pin.as_c_str().as_ptr(),
                message.as_ptr(),
                message_len,
                signature.as_mut_ptr(),
                &mut len,
            )
        };
        StatusCode::new(code).into_result()?;
        Ok(len as usize)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &DevicePublicKey,
        signature: &[u8],
    ) -> DeviceResult<()> {
        let message_len = c_len(message.len())?;
        let public_key_len = c_len(public_key.len())?;
        let signature_len = c_len(signature.len())?;
        // SAFETY: all three buffers are readable for their stated lengths.
        let code = unsafe {
            X_Verify(
                message.as_ptr(),
                message_len,
                public_key.as_ptr(),
                public_key_len,
                signature.as_ptr(),
                signature_len,
            )
        };
        StatusCode::new(code).into_result()
    }
}

impl Cipher for XSignDevice {
    fn encrypt(
        &self,
        public_key: &DevicePublicKey,
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> DeviceResult<usize> {
        let public_key_len = c_len(public_key.len())?;
        let plaintext_len = c_len(plaintext.len())?;
        let mut len = c_len(ciphertext.len())?;
        // SAFETY: inputs are readable for their stated lengths; `ciphertext`
        // is writable for `len` bytes.
        let code = unsafe {
            X_AsymmEncrypt(
                public_key.as_ptr(),
                public_key_len,
                plaintext.as_ptr(),
                plaintext_len,
                ciphertext.as_mut_ptr(),
                &mut len,
            )
        };
        StatusCode::new(code).into_result()?;
        Ok(len as usize)
    }

    fn decrypt(
        &self,
        session: &mut XSignSession,
        label: &Label,
        pin: &Pin,
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> DeviceResult<usize> {
        let ciphertext_len = c_len(ciphertext.len())?;
        let mut len = c_len(plaintext.len())?;
        // SAFETY: strings are NUL-terminated; `ciphertext` is readable and
        // `plaintext` writable for their stated lengths.
        let code = unsafe {
            X_AsymmDecrypt(
                session.handle,
                label.as_c_str().as_ptr(),
                pin.as_c_str().as_ptr(),
                ciphertext.as_ptr(),
                ciphertext_len,
                plaintext.as_mut_ptr(),
                &mut len,
            )
        };
        StatusCode::new(code).into_result()?;
        Ok(len as usize)
    }
}
