use async_trait::async_trait;
use ckb_error::Error;
use ckb_types::core::FeeRate;

/// Recommends fee rates.
#[async_trait]
pub trait FeeRateProvider: Send + Sync {
    /// The recommended fee rate over the last `block_range` blocks, capped at `max_fee_rate`.
    async fn get_fee_rate(
        &self,
        block_range: Option<u64>,
        max_fee_rate: Option<FeeRate>,
    ) -> Result<FeeRate, Error>;
}
