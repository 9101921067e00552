use std::ffi::{CStr, CString};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name under which a key pair is stored inside the device
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Label(CString);

impl Label {
    pub fn new(label: &str) -> Result<Self, LabelError> {
        if label.is_empty() {
            return Err(LabelError::Empty);
        }
        CString::new(label)
            .map(Self)
            .map_err(|_| LabelError::InteriorNul)
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    /// Lossy only in theory: labels are always built from `&str`.
    pub fn to_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::new(label)
    }
}

impl TryFrom<&str> for Label {
    type Error = LabelError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        Self::new(label)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:?})", self.to_str_lossy())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelError {
    #[error("key label must not be empty")]
    Empty,

    #[error("key label must not contain NUL bytes")]
    InteriorNul,
}
