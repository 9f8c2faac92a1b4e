//! Chain epochs as exact mixed-number rationals.
//!
//! An epoch is `integer + numerator / denominator`. The all-zero value, whose denominator is zero,
//! is the genesis epoch; every other epoch has a positive denominator.
#[cfg(test)]
mod tests;

use ckb_error::{impl_error_conversion_with_kind, prelude::*, ErrorKind};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// The default estimated duration of one epoch, four hours.
pub const EPOCH_IN_MILLISECONDS: u64 = 4 * 60 * 60 * 1000;

const INTEGER_LIMIT: i64 = 1 << 24;
const FRACTION_LIMIT: i64 = 1 << 16;

/// Errors raised while building or packing an epoch.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochError {
    /// A packed epoch cannot hold negative components.
    #[error("Negative values in Epoch to Num conversion")]
    Negative,
    /// A component does not fit its packed bit width.
    #[error("Integer must be < 2^24, numerator and denominator must be < 2^16")]
    Overflow,
    /// The denominator is negative, or zero on a non-zero epoch.
    #[error("Invalid epoch denominator in {integer} {numerator}/{denominator}")]
    InvalidDenominator {
        /// Whole epochs.
        integer: i64,
        /// Fraction numerator.
        numerator: i64,
        /// The offending denominator.
        denominator: i64,
    },
}

impl_error_conversion_with_kind!(EpochError, ErrorKind::Epoch, ckb_error::Error);

/// Represents `integer + numerator / denominator` epochs.
///
/// Equality and ordering compare the rational value, so `1 1/2 == 1 2/4`.
#[derive(Clone, Copy, Debug)]
pub struct Epoch {
    integer: i64,
    numerator: i64,
    denominator: i64,
}

impl Epoch {
    /// Creates an epoch after checking the denominator.
    ///
    /// The numerator may be negative or exceed the denominator, [`Epoch::normalize`] fixes that
    /// up.
    pub fn new(integer: i64, numerator: i64, denominator: i64) -> Result<Self, EpochError> {
        if denominator < 0 || (denominator == 0 && (integer != 0 || numerator != 0)) {
            return Err(EpochError::InvalidDenominator {
                integer,
                numerator,
                denominator,
            });
        }
        Ok(Epoch::new_raw(integer, numerator, denominator))
    }

    /// Creates an epoch without any check.
    #[inline]
    pub const fn new_raw(integer: i64, numerator: i64, denominator: i64) -> Self {
        Epoch {
            integer,
            numerator,
            denominator,
        }
    }

    /// The genesis epoch, the only epoch with a zero denominator.
    #[inline]
    pub const fn genesis() -> Self {
        Epoch::new_raw(0, 0, 0)
    }

    /// Exactly 180 epochs, the length of one Nervos DAO cycle.
    #[inline]
    pub const fn one_nervos_dao_cycle() -> Self {
        Epoch::new_raw(180, 0, 1)
    }

    /// Whole epochs.
    pub fn integer(&self) -> i64 {
        self.integer
    }

    /// Fraction numerator.
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    /// Fraction denominator.
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Tells whether this is the zero-denominator sentinel.
    #[inline]
    pub fn is_genesis(&self) -> bool {
        self.denominator == 0
    }

    /// Makes the denominator positive without reducing the fraction.
    ///
    /// A zero denominator becomes `0/1`, a negative one flips the signs of both fraction parts.
    pub fn normalize_base(&self) -> Self {
        match self.denominator.cmp(&0) {
            Ordering::Equal => Epoch::new_raw(self.integer, 0, 1),
            Ordering::Less => Epoch::new_raw(self.integer, -self.numerator, -self.denominator),
            Ordering::Greater => *self,
        }
    }

    /// Puts the epoch into canonical form, `0 <= numerator < denominator` in lowest terms.
    ///
    /// The genesis sentinel is returned unchanged.
    ///
    /// ## Panics
    ///
    /// Panics when a carried component overflows `i64`.
    pub fn normalize(&self) -> Self {
        if self.is_genesis() {
            return *self;
        }
        let base = self.normalize_base();
        canonical(
            i128::from(base.integer),
            i128::from(base.numerator),
            i128::from(base.denominator),
        )
        .expect("normalized epoch overflows i64")
    }

    /// Computes `self + rhs`, returning `None` on overflow.
    ///
    /// The genesis sentinel is the additive identity: adding it returns the other side verbatim.
    pub fn checked_add(&self, rhs: &Epoch) -> Option<Self> {
        if rhs.is_genesis() {
            return Some(*self);
        }
        if self.is_genesis() {
            return Some(*rhs);
        }
        let t = self.normalize_base();
        let o = rhs.normalize_base();
        let integer = i128::from(t.integer) + i128::from(o.integer);
        let (tn, td) = (i128::from(t.numerator), i128::from(t.denominator));
        let (on, od) = (i128::from(o.numerator), i128::from(o.denominator));
        let (numerator, denominator) = if td != od {
            (tn * od + on * td, td * od)
        } else {
            (tn + on, td)
        };
        canonical(integer, numerator, denominator)
    }

    /// Computes `self - rhs`, returning `None` on overflow.
    pub fn checked_sub(&self, rhs: &Epoch) -> Option<Self> {
        if rhs.is_genesis() {
            return Some(*self);
        }
        let negated = Epoch::new_raw(
            rhs.integer.checked_neg()?,
            rhs.numerator.checked_neg()?,
            rhs.denominator,
        );
        if self.is_genesis() {
            let base = negated.normalize_base();
            return canonical(
                i128::from(base.integer),
                i128::from(base.numerator),
                i128::from(base.denominator),
            );
        }
        self.checked_add(&negated)
    }

    /// Packs the epoch into the RPC number layout.
    ///
    /// `integer` takes bits 0..24, `numerator` bits 24..40 and `denominator` bits 40..56.
    pub fn to_num(&self) -> Result<u64, EpochError> {
        if self.integer < 0 || self.numerator < 0 || self.denominator < 0 {
            return Err(EpochError::Negative);
        }
        if self.integer >= INTEGER_LIMIT
            || self.numerator >= FRACTION_LIMIT
            || self.denominator >= FRACTION_LIMIT
        {
            return Err(EpochError::Overflow);
        }
        Ok(self.integer as u64 | (self.numerator as u64) << 24 | (self.denominator as u64) << 40)
    }

    /// Unpacks an epoch from the RPC number layout, ignoring bits above 56.
    pub fn from_num(num: u64) -> Self {
        Epoch::new_raw(
            (num & 0xff_ffff) as i64,
            ((num >> 24) & 0xffff) as i64,
            ((num >> 40) & 0xffff) as i64,
        )
    }

    /// The packed number as a `0x`-prefixed hex string without leading zeros.
    pub fn to_packed_hex(&self) -> Result<String, EpochError> {
        self.to_num().map(|num| format!("{num:#x}"))
    }

    /// Estimates the unix timestamp in milliseconds at which this epoch starts.
    ///
    /// The estimate assumes every epoch after `reference_epoch`, which started at
    /// `reference_timestamp`, lasts `epoch_in_milliseconds`. Returns `None` when the estimate
    /// falls before the unix epoch or overflows.
    pub fn to_unix(
        &self,
        reference_epoch: &Epoch,
        reference_timestamp: u64,
        epoch_in_milliseconds: u64,
    ) -> Option<u64> {
        let delta = self.checked_sub(reference_epoch)?.normalize_base();
        let per_epoch = i128::from(epoch_in_milliseconds);
        let timestamp = i128::from(reference_timestamp)
            + per_epoch * i128::from(delta.integer)
            + per_epoch * i128::from(delta.numerator) / i128::from(delta.denominator);
        u64::try_from(timestamp).ok()
    }
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

// Requires a positive denominator.
fn canonical(mut integer: i128, mut numerator: i128, mut denominator: i128) -> Option<Epoch> {
    if numerator < 0 {
        let borrow = (-numerator + denominator - 1) / denominator;
        integer -= borrow;
        numerator += denominator * borrow;
    }
    let g = gcd(numerator, denominator);
    numerator /= g;
    denominator /= g;
    integer += numerator / denominator;
    numerator %= denominator;
    Some(Epoch::new_raw(
        i64::try_from(integer).ok()?,
        i64::try_from(numerator).ok()?,
        i64::try_from(denominator).ok()?,
    ))
}

impl Default for Epoch {
    fn default() -> Self {
        Epoch::genesis()
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}/{}", self.integer, self.numerator, self.denominator)
    }
}

impl Ord for Epoch {
    fn cmp(&self, other: &Self) -> Ordering {
        let t = self.normalize_base();
        let o = other.normalize_base();
        let (td, od) = (i128::from(t.denominator), i128::from(o.denominator));
        let a = i128::from(t.integer) * td + i128::from(t.numerator);
        let b = i128::from(o.integer) * od + i128::from(o.numerator);
        if td == od {
            a.cmp(&b)
        } else {
            (a * od).cmp(&(b * td))
        }
    }
}

impl PartialOrd for Epoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Epoch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Epoch {}

impl Add<Epoch> for Epoch {
    type Output = Epoch;

    /// ## Panics
    ///
    /// Panics on `i64` overflow.
    fn add(self, rhs: Epoch) -> Epoch {
        self.checked_add(&rhs).expect("epoch addition overflows i64")
    }
}

impl Sub<Epoch> for Epoch {
    type Output = Epoch;

    /// ## Panics
    ///
    /// Panics on `i64` overflow.
    fn sub(self, rhs: Epoch) -> Epoch {
        self.checked_sub(&rhs).expect("epoch subtraction overflows i64")
    }
}
