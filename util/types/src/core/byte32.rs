use crate::{core::error::EntityError, utilities::hex};
use ckb_molecule_compiler::Value;
use std::{fmt, str::FromStr};

/// A 32-byte digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Byte32([u8; 32]);

impl Byte32 {
    /// Wraps raw bytes.
    pub const fn new(inner: [u8; 32]) -> Self {
        Byte32(inner)
    }

    /// All zeros.
    pub const fn zero() -> Self {
        Byte32([0u8; 32])
    }

    /// Copies from a slice of exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, EntityError> {
        let inner: [u8; 32] = slice.try_into().map_err(|_| EntityError::InvalidLength {
            entity: "Byte32",
            expected: 32,
            actual: slice.len(),
        })?;
        Ok(Byte32(inner))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether all bytes are zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl AsRef<[u8]> for Byte32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Byte32 {
    fn from(inner: [u8; 32]) -> Self {
        Byte32(inner)
    }
}

impl From<Byte32> for Value {
    fn from(hash: Byte32) -> Self {
        Value::Bytes(hash.0.to_vec().into())
    }
}

impl FromStr for Byte32 {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Byte32::from_slice(&hex::decode(s)?)
    }
}

impl fmt::Display for Byte32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Byte32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Byte32({self})")
    }
}
