//! Device result code translation
//!
//! Raw device codes become an [`Outcome`] at the boundary; nothing downstream
//! compares magic numbers.

use std::fmt;

use tracing::warn;

use crate::error::{HsmError, HsmResult};
use crate::ports::DeviceResult;

/// Raw 32-bit result code reported by the device
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u32);

impl StatusCode {
    pub const SUCCESS: Self = Self(0x0000_0000);

    /// Signature did not verify. Only [`Operation::Verify`] gives it a meaning.
    pub const VERIFY_FAILED: Self = Self(0x0100_000E);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Success becomes `Ok(())`, anything else is carried as the error.
    pub fn into_result(self) -> DeviceResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({:#010X})", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Structured meaning of a device result code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    VerificationFailed,
    OperationError(StatusCode),
}

impl From<StatusCode> for Outcome {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::SUCCESS => Outcome::Success,
            StatusCode::VERIFY_FAILED => Outcome::VerificationFailed,
            other => Outcome::OperationError(other),
        }
    }
}

/// Device primitive an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetVersion,
    GenerateKey,
    DeleteKey,
    GetPublicKey,
    Sign,
    Verify,
    Encrypt,
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::GetVersion => "get-version",
            Operation::GenerateKey => "generate-key",
            Operation::DeleteKey => "delete-key",
            Operation::GetPublicKey => "get-public-key",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        };
        f.write_str(name)
    }
}

/// Translate the result of any primitive except verify.
///
/// The verification-failed code is an ordinary failure here.
pub fn check<T>(op: Operation, result: DeviceResult<T>) -> HsmResult<T> {
    result.map_err(|code| {
        warn!("Device {} failed with status {}", op, code);
        HsmError::Operation { op, code }
    })
}

/// Translate the result of the verify primitive into a boolean verdict.
pub fn check_verify(result: DeviceResult<()>) -> HsmResult<bool> {
    let code = match result {
        Ok(()) => return Ok(true),
        Err(code) => code,
    };

    match Outcome::from(code) {
        Outcome::Success => Ok(true),
        Outcome::VerificationFailed => Ok(false),
        Outcome::OperationError(code) => {
            warn!("Device {} failed with status {}", Operation::Verify, code);
            Err(HsmError::Operation {
                op: Operation::Verify,
                code,
            })
        }
    }
}
