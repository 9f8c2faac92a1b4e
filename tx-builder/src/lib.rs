//! Completes CKB transactions.
//!
//! A transaction is built with its outputs first. The functions here then find the inputs to pay
//! for them, balance UDT amounts and settle the fee, sending the leftover capacity to a change
//! output. Cells come from the collaborators in [`ckb_traits`]; the spent cells are cached on the
//! inputs as they are resolved.
//!
//! The same operations are available as methods through [`TransactionExt`].

mod error;
mod ext;
mod fee;
mod lookup;
mod select;

#[cfg(test)]
mod tests;

pub use crate::error::BalanceError;
pub use crate::ext::TransactionExt;
pub use crate::fee::{
    complete_fee, complete_fee_change_to_lock, complete_fee_change_to_output, CompleteFeeOptions,
};
pub use crate::lookup::{
    fee, fee_rate, find_input_index_by_lock, find_input_index_by_lock_id,
    find_last_input_index_by_lock, inputs_capacity, inputs_udt_balance,
    prepare_sighash_all_witness, sign_hash_info,
};
pub use crate::select::{
    complete_inputs, complete_inputs_add_one, complete_inputs_all, complete_inputs_at_least_one,
    complete_inputs_by_capacity, complete_inputs_by_udt, Completion,
};
