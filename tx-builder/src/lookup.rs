//! Queries over the inputs of a transaction.
//!
//! Inputs are resolved through a [`CellProvider`] on first access and the spent cells are cached
//! on the inputs, so later queries don't go back to the provider.

use crate::error::BalanceError;
use ckb_error::Error;
use ckb_traits::CellProvider;
use ckb_types::{
    core::{
        error::TransactionError,
        Byte32, Capacity, FeeRate, Script, ScriptHashType, SignHashInfo, Transaction,
        TX_SIZE_OFFSET,
    },
    utilities::udt_balance,
};

/// Resolves every input and returns the spent cells' total capacity.
pub async fn inputs_capacity<P>(tx: &mut Transaction, provider: &P) -> Result<Capacity, Error>
where
    P: CellProvider + ?Sized,
{
    let mut total = Capacity::zero();
    for input in tx.inputs.iter_mut() {
        let cell = provider.resolve_input(input).await?;
        total = total
            .safe_add(cell.cell_output.capacity)
            .map_err(TransactionError::from)?;
    }
    Ok(total)
}

/// UDT balance and count of the inputs typed with `type_script`.
pub(crate) async fn inputs_udt_balance_and_count<P>(
    tx: &mut Transaction,
    provider: &P,
    type_script: &Script,
) -> Result<(u128, usize), Error>
where
    P: CellProvider + ?Sized,
{
    let mut balance = 0u128;
    let mut count = 0;
    for input in tx.inputs.iter_mut() {
        let cell = provider.resolve_input(input).await?;
        if cell.cell_output.type_.as_ref() != Some(type_script) {
            continue;
        }
        balance = balance.saturating_add(udt_balance(&cell.output_data));
        count += 1;
    }
    Ok((balance, count))
}

/// Sum of UDT balances held by the inputs typed with `type_script`.
pub async fn inputs_udt_balance<P>(
    tx: &mut Transaction,
    provider: &P,
    type_script: &Script,
) -> Result<u128, Error>
where
    P: CellProvider + ?Sized,
{
    inputs_udt_balance_and_count(tx, provider, type_script)
        .await
        .map(|(balance, _)| balance)
}

/// Inputs capacity minus outputs capacity, in shannons. Negative while the outputs aren't covered.
pub(crate) async fn signed_fee<P>(tx: &mut Transaction, provider: &P) -> Result<i128, Error>
where
    P: CellProvider + ?Sized,
{
    let inputs = inputs_capacity(tx, provider).await?;
    let outputs = tx.outputs_capacity().map_err(TransactionError::from)?;
    Ok(i128::from(inputs.as_u64()) - i128::from(outputs.as_u64()))
}

/// The fee the transaction pays, inputs capacity minus outputs capacity.
///
/// Fails with [`BalanceError::InsufficientCapacity`] when the outputs hold more than the inputs.
pub async fn fee<P>(tx: &mut Transaction, provider: &P) -> Result<Capacity, Error>
where
    P: CellProvider + ?Sized,
{
    let fee = signed_fee(tx, provider).await?;
    if fee < 0 {
        let shortfall = u64::try_from(-fee).unwrap_or(u64::MAX);
        return Err(BalanceError::insufficient_capacity(Capacity::shannons(shortfall)).into());
    }
    Ok(Capacity::shannons(fee as u64))
}

/// The fee rate the transaction pays, in shannons per 1000 bytes.
pub async fn fee_rate<P>(tx: &mut Transaction, provider: &P) -> Result<FeeRate, Error>
where
    P: CellProvider + ?Sized,
{
    let fee = fee(tx, provider).await?;
    Ok(FeeRate::calculate(
        fee.as_u64(),
        tx.serialized_size() + TX_SIZE_OFFSET,
    ))
}

/// Index of the first input locked by `lock`.
pub async fn find_input_index_by_lock<P>(
    tx: &mut Transaction,
    lock: &Script,
    provider: &P,
) -> Result<Option<usize>, Error>
where
    P: CellProvider + ?Sized,
{
    for (index, input) in tx.inputs.iter_mut().enumerate() {
        if &provider.resolve_input(input).await?.cell_output.lock == lock {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Index of the last input locked by `lock`.
pub async fn find_last_input_index_by_lock<P>(
    tx: &mut Transaction,
    lock: &Script,
    provider: &P,
) -> Result<Option<usize>, Error>
where
    P: CellProvider + ?Sized,
{
    for (index, input) in tx.inputs.iter_mut().enumerate().rev() {
        if &provider.resolve_input(input).await?.cell_output.lock == lock {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Index of the first input whose lock runs the code `code_hash` with `hash_type`, whatever its
/// args.
pub async fn find_input_index_by_lock_id<P>(
    tx: &mut Transaction,
    code_hash: &Byte32,
    hash_type: ScriptHashType,
    provider: &P,
) -> Result<Option<usize>, Error>
where
    P: CellProvider + ?Sized,
{
    for (index, input) in tx.inputs.iter_mut().enumerate() {
        let cell = provider.resolve_input(input).await?;
        let lock = &cell.cell_output.lock;
        if &lock.code_hash == code_hash && lock.hash_type == hash_type {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// The sighash-all digest of `lock` and the witness to put its signature in.
///
/// Only inputs at a witness index take part, the others are not resolved.
pub async fn sign_hash_info<P>(
    tx: &mut Transaction,
    lock: &Script,
    provider: &P,
) -> Result<Option<SignHashInfo>, Error>
where
    P: CellProvider + ?Sized,
{
    let covered = tx.witnesses.len().min(tx.inputs.len());
    for input in tx.inputs.iter_mut().take(covered) {
        provider.resolve_input(input).await?;
    }
    Ok(tx.sign_hash_info(lock))
}

/// Puts a zero-filled lock of `lock_len` bytes into the witness of the first input locked by
/// `lock`.
///
/// Returns whether such an input exists; the transaction is untouched when it doesn't.
pub async fn prepare_sighash_all_witness<P>(
    tx: &mut Transaction,
    lock: &Script,
    lock_len: usize,
    provider: &P,
) -> Result<bool, Error>
where
    P: CellProvider + ?Sized,
{
    match find_input_index_by_lock(tx, lock, provider).await? {
        Some(position) => {
            tx.set_witness_lock_placeholder(position, lock_len)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
