//! Utility functions.

pub mod hex;
mod udt;

pub use udt::{udt_balance, UDT_BALANCE_LEN};
