//! Underlying error types used over ckb-ccc crates.

use std::{error::Error as StdError, fmt, ops::Deref, sync::Arc};

mod convert;
mod internal;
pub mod prelude;
pub mod util;

use derive_more::Display;
pub use internal::{InternalError, InternalErrorKind, OtherError, SilentError};
use prelude::*;

/// A wrapper around a dynamic error type.
#[derive(Debug, Clone)]
pub struct AnyError(Arc<anyhow::Error>);

/// A list specifying categories of ckb-ccc error.
///
/// This list is intended to grow over time and it is not recommended to exhaustively match against
/// it.
///
/// It is used with [`Error`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum ErrorKind {
    /// A molecule schema failed validation or could not be compiled.
    Schema,
    /// Bytes could not be encoded or decoded by a compiled codec.
    Codec,
    /// An entity was built from malformed loose input.
    Entity,
    /// An epoch could not be packed or normalized.
    Epoch,
    /// A transaction operation referenced something that does not exist.
    Transaction,
    /// Inputs could not be selected to balance a transaction.
    Balance,
    /// An external collaborator (cell supply, fee rate oracle, preparer) failed.
    Provider,
    /// Configuration could not be loaded.
    Config,
    /// It indicates that the underlying error is [`InternalError`]
    Internal,
}

def_error_base_on_kind!(Error, ErrorKind, "Top-level ckb-ccc error type.");

impl<E> From<E> for AnyError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(Arc::new(error.into()))
    }
}

impl AnyError {
    /// Borrows the wrapped error as a standard error object.
    pub fn as_std_error(&self) -> &(dyn StdError + 'static) {
        &**self.0
    }
}

impl Deref for AnyError {
    type Target = Arc<anyhow::Error>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
