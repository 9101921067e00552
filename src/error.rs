//! Error types for hsm-sm2
//!
//! This module defines the error hierarchy for all device operations.
//! Errors are organized hierarchically and use thiserror for implementation.
//!
//! A failed signature verification is not an error: `verify` reports it as `Ok(false)`.

use std::fmt;

use thiserror::Error;

use crate::logic::{Operation, StatusCode};

/// Result type alias for hsm-sm2 operations
pub type HsmResult<T> = Result<T, HsmError>;

/// Top-level error type for all hsm-sm2 operations
#[derive(Error, Debug)]
pub enum HsmError {
    /// The device session could not be opened
    #[error("failed to {stage} device session: status {code}")]
    Session { stage: SessionStage, code: StatusCode },

    /// Any other non-success result reported by the device
    #[error("device operation {op} failed: status {code}")]
    Operation { op: Operation, code: StatusCode },

    /// Key and length conversion errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Domain validation errors
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Rejected before reaching the device
    #[error("{what} must not be empty")]
    EmptyInput { what: &'static str },

    /// The device reported writing more bytes than the buffer it was given
    #[error("device operation {op} reported {reported} bytes for a {capacity} byte buffer")]
    BufferOverflow {
        op: Operation,
        capacity: usize,
        reported: usize,
    },

    /// The device reported an output length other than the framing dictates
    #[error("device operation {op} reported {reported} bytes, expected {expected}")]
    LengthMismatch {
        op: Operation,
        expected: usize,
        reported: usize,
    },
}

impl HsmError {
    /// Raw device status code, when the error originated from the device
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            HsmError::Session { code, .. } | HsmError::Operation { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Stage of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Initialize,
    Finalize,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStage::Initialize => f.write_str("initialize"),
            SessionStage::Finalize => f.write_str("finalize"),
        }
    }
}

/// Public key and ciphertext framing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("public key length must be {expected}, actual: {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("public key does not survive re-encoding unchanged")]
    KeyRoundTripMismatch,

    #[error("public key coordinates are not a point on the SM2 curve")]
    InvalidPoint,

    #[error("public key coordinate is {actual} bytes, wider than {max}")]
    CoordinateTooWide { max: usize, actual: usize },

    #[error("ciphertext length {len} is invalid for a {overhead} byte overhead")]
    InvalidCipherLength { len: usize, overhead: usize },
}

/// Domain validation errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Key label error
    #[error("Label error: {0}")]
    Label(#[from] crate::model::LabelError),

    /// PIN validation error
    #[error("PIN validation error: {0}")]
    Pin(#[from] crate::model::PinError),

    /// Device configuration error
    #[error("Device configuration error: {0}")]
    DeviceConfig(#[from] crate::model::DeviceConfigError),

    /// Signature error
    #[error("Signature error: {0}")]
    Signature(#[from] crate::model::SignatureError),
}

/// Convert model errors to HsmError (via DomainError)
impl From<crate::model::LabelError> for HsmError {
    fn from(err: crate::model::LabelError) -> Self {
        HsmError::Domain(DomainError::Label(err))
    }
}

impl From<crate::model::PinError> for HsmError {
    fn from(err: crate::model::PinError) -> Self {
        HsmError::Domain(DomainError::Pin(err))
    }
}

impl From<crate::model::DeviceConfigError> for HsmError {
    fn from(err: crate::model::DeviceConfigError) -> Self {
        HsmError::Domain(DomainError::DeviceConfig(err))
    }
}

impl From<crate::model::SignatureError> for HsmError {
    fn from(err: crate::model::SignatureError) -> Self {
        HsmError::Domain(DomainError::Signature(err))
    }
}
