//! Errors raised while building entities or operating on transactions.

use crate::core::OutPoint;
use ckb_epoch::EpochError;
use ckb_error::{impl_error_conversion_with_kind, prelude::*, ErrorKind};
use ckb_molecule_compiler::CodecError;

/// Errors raised while coercing loose input into an entity or decoding one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Not a valid hex string.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// A fixed-size field got the wrong number of bytes.
    #[error("Invalid {entity} length, expected {expected}, but got {actual}")]
    InvalidLength {
        /// Entity name.
        entity: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Unknown script hash type.
    #[error("Invalid hash type {0}")]
    InvalidHashType(String),

    /// Unknown cell dep type.
    #[error("Invalid dep type {0}")]
    InvalidDepType(String),

    /// A number could not be parsed or does not fit its field.
    #[error("Invalid number {0}")]
    InvalidNumber(String),

    /// A since field name is not recognized.
    #[error("Invalid since field {0}")]
    InvalidSince(String),

    /// Output capacity computed from the occupied size overflows.
    #[error("Capacity overflow")]
    CapacityOverflow,

    /// The since value does not fit 56 bits.
    #[error("Since value {0:#x} exceeds 56 bits")]
    SinceValueOverflow(u64),

    /// The since metric bits hold the reserved selector.
    #[error("Invalid since metric in {0:#x}")]
    InvalidSinceMetric(u64),

    /// A decoded record lacks a field or holds the wrong shape.
    #[error("Malformed {entity}: field {field}")]
    Malformed {
        /// Entity name.
        entity: &'static str,
        /// Field name.
        field: &'static str,
    },

    /// The codec rejected the bytes.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The epoch is not valid.
    #[error(transparent)]
    Epoch(#[from] EpochError),
}

impl_error_conversion_with_kind!(EntityError, ErrorKind::Entity, ckb_error::Error);

/// Errors raised by transaction operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The cell an input spends could not be found.
    #[error("Unable to complete input {0}")]
    UnresolvableInput(OutPoint),

    /// A capacity sum overflowed.
    #[error("Capacity overflow")]
    CapacityOverflow,
}

impl_error_conversion_with_kind!(TransactionError, ErrorKind::Transaction, ckb_error::Error);

impl From<ckb_occupied_capacity::Error> for TransactionError {
    fn from(_: ckb_occupied_capacity::Error) -> Self {
        TransactionError::CapacityOverflow
    }
}
