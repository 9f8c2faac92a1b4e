use std::fmt;

/// Shannons in one CKB, the fixed-point scale of every capacity.
pub const BYTE_SHANNONS: u64 = 100_000_000;

/// CKB capacity.
///
/// It is encoded as the amount of `Shannons` internally.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(u64);

/// Numeric errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Numeric overflow.
    #[error("OccupiedCapacity: overflow")]
    Overflow,
}

/// Numeric operation result.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Capacity {
    /// Capacity of zero Shannons.
    pub const fn zero() -> Self {
        Capacity(0)
    }

    /// Capacity of one Shannon.
    pub const fn one() -> Self {
        Capacity(1)
    }

    /// Views the capacity as Shannons.
    pub const fn shannons(val: u64) -> Self {
        Capacity(val)
    }

    /// Views the capacity as CKBytes.
    ///
    /// Every occupied byte costs one CKB, so this is also the capacity a cell needs to store
    /// `val` bytes.
    pub fn bytes(val: usize) -> Result<Self> {
        (val as u64)
            .checked_mul(BYTE_SHANNONS)
            .map(Capacity::shannons)
            .ok_or(Error::Overflow)
    }

    /// Views the capacity as Shannons.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true if the capacity is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds self and rhs and checks overflow error.
    pub fn safe_add<C: Into<Capacity>>(self, rhs: C) -> Result<Self> {
        self.0
            .checked_add(rhs.into().0)
            .map(Capacity::shannons)
            .ok_or(Error::Overflow)
    }

    /// Subtracts self and rhs and checks overflow error.
    pub fn safe_sub<C: Into<Capacity>>(self, rhs: C) -> Result<Self> {
        self.0
            .checked_sub(rhs.into().0)
            .map(Capacity::shannons)
            .ok_or(Error::Overflow)
    }

    /// Subtracts rhs from self, flooring the result at zero.
    pub fn saturating_sub<C: Into<Capacity>>(self, rhs: C) -> Self {
        Capacity(self.0.saturating_sub(rhs.into().0))
    }

    /// Multiplies self and rhs and checks overflow error.
    pub fn safe_mul<C: Into<Capacity>>(self, rhs: C) -> Result<Self> {
        self.0
            .checked_mul(rhs.into().0)
            .map(Capacity::shannons)
            .ok_or(Error::Overflow)
    }

    /// Sums an iterator of capacities and checks overflow error.
    pub fn safe_sum<I: IntoIterator<Item = Capacity>>(iter: I) -> Result<Self> {
        iter.into_iter()
            .try_fold(Capacity::zero(), |acc, c| acc.safe_add(c))
    }

    /// Formats the capacity in CKB, trimming trailing fractional zeros.
    ///
    /// `150_000_000` Shannons renders as `1.5`, `10_000_000_000` as `100`.
    pub fn to_ckb_string(self) -> String {
        let integer = self.0 / BYTE_SHANNONS;
        let fraction = self.0 % BYTE_SHANNONS;
        if fraction == 0 {
            return integer.to_string();
        }
        let fraction = format!("{fraction:08}");
        format!("{integer}.{}", fraction.trim_end_matches('0'))
    }
}

impl From<u64> for Capacity {
    fn from(val: u64) -> Self {
        Capacity::shannons(val)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
