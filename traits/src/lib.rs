//! The collaborators transaction building relies on.
//!
//! Every method is fallible with a [`ckb_error::Error`]; implementations usually wrap RPC or
//! indexer failures with [`ckb_error::ErrorKind::Provider`].
mod cell_collector;
mod cell_filter;
mod cell_provider;
mod fee_rate_provider;
mod transaction_preparer;

pub use crate::cell_collector::{CellCollector, CellStream};
pub use crate::cell_filter::CellFilter;
pub use crate::cell_provider::CellProvider;
pub use crate::fee_rate_provider::FeeRateProvider;
pub use crate::transaction_preparer::TransactionPreparer;

/// Everything needed to complete a transaction on behalf of one owner.
///
/// Implemented for every type providing all the collaborators.
pub trait Signer: CellProvider + CellCollector + FeeRateProvider + TransactionPreparer {}

impl<T> Signer for T where T: CellProvider + CellCollector + FeeRateProvider + TransactionPreparer {}
