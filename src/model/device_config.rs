use std::ffi::{CStr, CString};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Device configuration string handed verbatim to the device on session initialize
///
/// Its structure is vendor-defined; the only rule enforced here is the C string one.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceConfig(CString);

impl DeviceConfig {
    pub fn new(config: &str) -> Result<Self, DeviceConfigError> {
        CString::new(config)
            .map(Self)
            .map_err(|_| DeviceConfigError::InteriorNul)
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    pub fn to_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl FromStr for DeviceConfig {
    type Err = DeviceConfigError;

    fn from_str(config: &str) -> Result<Self, Self::Err> {
        Self::new(config)
    }
}

impl TryFrom<&str> for DeviceConfig {
    type Error = DeviceConfigError;

    fn try_from(config: &str) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceConfig({:?})", self.to_str_lossy())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceConfigError {
    #[error("device configuration must not contain NUL bytes")]
    InteriorNul,
}
