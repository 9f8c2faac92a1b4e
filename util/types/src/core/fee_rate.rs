use serde::{Deserialize, Serialize};
use std::fmt;

/// shannons per kilobytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(pub u64);

const KB: u64 = 1000;

impl FeeRate {
    /// Calculates the fee rate paid by `fee` shannons for `size` bytes, rounding down.
    pub fn calculate(fee: u64, size: usize) -> Self {
        if size == 0 {
            return FeeRate::zero();
        }
        let rate = u128::from(fee) * u128::from(KB) / size as u128;
        FeeRate::from_u64(u64::try_from(rate).unwrap_or(u64::MAX))
    }

    /// Wraps shannons per kilobyte.
    pub const fn from_u64(fee_per_kb: u64) -> Self {
        FeeRate(fee_per_kb)
    }

    /// Shannons per kilobyte.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// A zero rate.
    pub const fn zero() -> Self {
        Self::from_u64(0)
    }

    /// The fee for `size` bytes, rounding up.
    pub fn fee(self, size: usize) -> u64 {
        let fee = (u128::from(self.0) * size as u128).div_ceil(u128::from(KB));
        u64::try_from(fee).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} shannons/KB", self.0)
    }
}
