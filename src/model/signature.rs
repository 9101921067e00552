use std::fmt;
use thiserror::Error;

/// Signature produced by the device
///
/// Opaque beyond its length bound; the layout is whatever the device emits.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub const MAX_LENGTH: usize = 256;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        Self::try_from(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl TryFrom<Vec<u8>> for Signature {
    type Error = SignatureError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            return Err(SignatureError::Empty);
        }
        if bytes.len() > Self::MAX_LENGTH {
            return Err(SignatureError::TooLong {
                max: Self::MAX_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature must not be empty")]
    Empty,

    #[error("signature length must be at most {max}, actual: {actual}")]
    TooLong { max: usize, actual: usize },
}
