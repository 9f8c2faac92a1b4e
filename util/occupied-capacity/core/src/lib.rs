//! Data structure measurement.

mod units;

pub use units::{Capacity, Error, Result};
