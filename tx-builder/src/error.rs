//! Errors raised while completing a transaction.

use ckb_error::{impl_error_conversion_with_kind, prelude::*, ErrorKind};
use ckb_types::core::{Capacity, Script};

/// Errors raised by input selection and fee completion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    /// The cells found can't cover the required capacity.
    #[error(
        "Insufficient CKB, need {} extra CKB{}",
        .amount.to_ckb_string(),
        change_suffix(.for_change)
    )]
    InsufficientCapacity {
        /// The shortfall.
        amount: Capacity,
        /// Whether the capacity was needed to create a change cell.
        for_change: bool,
    },

    /// The cells found can't cover the required UDT balance.
    #[error("Insufficient coin, need {amount} extra coin")]
    InsufficientCoin {
        /// The shortfall.
        amount: u128,
        /// The type script of the UDT.
        type_script: Script,
    },

    /// No new cell could be added.
    #[error("Insufficient CKB, need at least one new cell")]
    NoCellAvailable,

    /// The change function claimed to consume the capacity it was offered but left some of it.
    #[error("The change function doesn't use all available capacity")]
    ChangeUnderused,

    /// The transaction shrank after the change function ran.
    #[error("The change function removed existed transaction data")]
    ChangeShrankTransaction,

    /// The output to receive the change does not exist.
    #[error("Non-existed output to change")]
    OutputNotFound(usize),

    /// The fee didn't settle within the allowed rounds.
    #[error("The fee did not converge after {0} rounds")]
    FeeNotConverged(usize),
}

fn change_suffix(for_change: &bool) -> &'static str {
    if *for_change {
        " to create change cell"
    } else {
        ""
    }
}

impl BalanceError {
    pub(crate) fn insufficient_capacity(amount: Capacity) -> Self {
        BalanceError::InsufficientCapacity {
            amount,
            for_change: false,
        }
    }
}

impl_error_conversion_with_kind!(BalanceError, ErrorKind::Balance, ckb_error::Error);
