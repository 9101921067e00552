use std::ffi::{CStr, CString};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// PIN protecting a device-resident private key
///
/// Passed to the device as a C string, so it must be non-empty and free of NUL bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(CString);

impl Pin {
    pub fn new(pin: &str) -> Result<Self, PinError> {
        if pin.is_empty() {
            return Err(PinError::Empty);
        }
        CString::new(pin).map(Self).map_err(|_| PinError::InteriorNul)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }
}

impl FromStr for Pin {
    type Err = PinError;

    fn from_str(pin: &str) -> Result<Self, Self::Err> {
        Self::new(pin)
    }
}

impl TryFrom<&str> for Pin {
    type Error = PinError;

    fn try_from(pin: &str) -> Result<Self, Self::Error> {
        Self::new(pin)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin([REDACTED])")
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must not be empty")]
    Empty,

    #[error("PIN must not contain NUL bytes")]
    InteriorNul,
}
