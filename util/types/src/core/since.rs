use crate::core::error::EntityError;
use ckb_epoch::Epoch;

const RELATIVE_FLAG: u64 = 1 << 63;
const METRIC_SHIFT: u32 = 61;
const VALUE_MASK: u64 = 0x00ff_ffff_ffff_ffff;

/// What a since value counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SinceMetric {
    /// Block number.
    #[default]
    BlockNumber = 0,
    /// Packed epoch number, see [`Epoch::to_num`].
    Epoch = 1,
    /// Median block timestamp in seconds.
    Timestamp = 2,
}

/// An input time lock.
///
/// Packs into a `u64`: bit 63 is the relative flag, bits 61..63 the metric and bits 0..56 the
/// value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Since {
    /// Counted from the block committing the spent cell instead of from genesis.
    pub relative: bool,
    /// Unit of `value`.
    pub metric: SinceMetric,
    /// The lock value.
    pub value: u64,
}

impl Since {
    /// Creates a since after checking the value fits 56 bits.
    pub fn new(relative: bool, metric: SinceMetric, value: u64) -> Result<Self, EntityError> {
        if value & !VALUE_MASK != 0 {
            return Err(EntityError::SinceValueOverflow(value));
        }
        Ok(Since {
            relative,
            metric,
            value,
        })
    }

    /// An epoch since.
    pub fn from_epoch(epoch: Epoch, relative: bool) -> Result<Self, EntityError> {
        Since::new(relative, SinceMetric::Epoch, epoch.to_num()?)
    }

    /// Packs into the on-chain number.
    pub fn to_num(&self) -> u64 {
        let flag = if self.relative { RELATIVE_FLAG } else { 0 };
        flag | (self.metric as u64) << METRIC_SHIFT | (self.value & VALUE_MASK)
    }

    /// Unpacks the on-chain number.
    ///
    /// Bits 56..61 are ignored. The metric selector `3` is rejected.
    pub fn from_num(num: u64) -> Result<Self, EntityError> {
        let metric = match (num >> METRIC_SHIFT) & 0b11 {
            0 => SinceMetric::BlockNumber,
            1 => SinceMetric::Epoch,
            2 => SinceMetric::Timestamp,
            _ => return Err(EntityError::InvalidSinceMetric(num)),
        };
        Ok(Since {
            relative: num & RELATIVE_FLAG != 0,
            metric,
            value: num & VALUE_MASK,
        })
    }

    /// The value as an epoch, if the metric is [`SinceMetric::Epoch`].
    pub fn epoch(&self) -> Option<Epoch> {
        match self.metric {
            SinceMetric::Epoch => Some(Epoch::from_num(self.value)),
            _ => None,
        }
    }
}

impl From<Since> for u64 {
    fn from(since: Since) -> u64 {
        since.to_num()
    }
}

impl TryFrom<u64> for Since {
    type Error = EntityError;

    fn try_from(num: u64) -> Result<Self, Self::Error> {
        Since::from_num(num)
    }
}
