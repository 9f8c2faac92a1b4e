//! Rust types.
//!
//! Plain structs with public fields; serialization goes through [`Entity`](crate::prelude::Entity).

pub mod error;

mod blockchain;
mod byte32;
mod cell;
mod fee_rate;
mod script;
mod since;
mod transaction;
mod witness;

#[cfg(test)]
mod tests;

pub use blockchain::{DepType, ScriptHashType};
pub use byte32::Byte32;
pub use cell::{Cell, CellDep, CellInput, CellOutput, OutPoint, PreviousCell};
pub use fee_rate::FeeRate;
pub use script::Script;
pub use since::{Since, SinceMetric};
pub use transaction::{SignHashInfo, Transaction, TX_SIZE_OFFSET};
pub use witness::WitnessArgs;

pub use ckb_epoch::Epoch;
pub use ckb_occupied_capacity::{capacity_bytes, Capacity, Result as CapacityResult};
/// Transaction version.
pub type Version = u32;
