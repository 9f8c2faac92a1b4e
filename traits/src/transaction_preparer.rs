use async_trait::async_trait;
use ckb_error::Error;
use ckb_types::core::Transaction;

/// Fills witness placeholders so the serialized size matches the signed transaction.
#[async_trait]
pub trait TransactionPreparer: Send + Sync {
    /// Returns `tx` with placeholders sized like the signatures it will carry.
    async fn prepare_transaction(&self, tx: Transaction) -> Result<Transaction, Error>;
}
