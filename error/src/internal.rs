use crate::{
    def_error_base_on_kind,
    prelude::{Error as ThisError, *},
};
use derive_more::Display;
use std::fmt;

/// An error with no reason.
#[derive(ThisError, Debug, Clone, Copy)]
#[error("no reason is provided")]
pub struct SilentError;

/// An error with only a string as the reason.
#[derive(ThisError, Debug, Clone)]
#[error("{0}")]
pub struct OtherError(String);

/// A list specifying categories of internal errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum InternalErrorKind {
    /// An arithmetic overflow occurs during capacity calculation,
    /// e.g. `Capacity::safe_add`
    CapacityOverflow,

    /// A value that must be representable in a fixed width is too large
    NumberOverflow,

    /// An external collaborator returned data that contradicts itself
    DataCorrupted,

    /// Unknown system error
    System,
}

def_error_base_on_kind!(
    InternalError,
    InternalErrorKind,
    "An error caused by an arithmetic overflow or an inconsistent collaborator."
);

impl_error_conversion_with_kind!(InternalError, crate::ErrorKind::Internal, crate::Error);

impl OtherError {
    /// Creates an error with only a string as the reason.
    pub fn new<T>(reason: T) -> Self
    where
        T: fmt::Display,
    {
        Self(reason.to_string())
    }
}
