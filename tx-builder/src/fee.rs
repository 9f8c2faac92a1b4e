//! Fee completion.
//!
//! [`complete_fee`] works on a copy of the transaction and commits it only once the fee it pays
//! equals the fee its own size requires at the chosen rate. Each round selects inputs, lets the
//! signer prepare the witnesses and settles the leftover with a change function:
//!
//! * the leftover is exactly the fee: commit without change;
//! * the change function asks for more capacity: select again with that extra target;
//! * the change function settles the leftover: re-estimate the fee of the changed copy and commit
//!   if it didn't grow, otherwise start over with the larger fee.
//!
//! The leftover handed to the change function is signed. A negative one is a deficit the change
//! function may cover out of an existing output, which is how a transaction spending everything
//! to a single output pays its fee.
//!
//! The fee estimate never decreases between rounds and the number of rounds is bounded by
//! [`CompleteFeeOptions::max_fee_iterations`].

use crate::{
    error::BalanceError,
    lookup::{inputs_capacity, signed_fee},
    select::complete_inputs_by_capacity,
};
use ckb_error::Error;
use ckb_traits::{CellFilter, Signer};
use ckb_tx_builder_config::Config;
use ckb_types::{
    bytes::Bytes,
    core::{error::TransactionError, Capacity, CellOutput, FeeRate, Script, Transaction},
};
use log::{debug, trace};
use std::cmp::Ordering;

/// Per-call knobs of [`complete_fee`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompleteFeeOptions {
    /// Fee rate used when the caller passes none. When both are `None` the rate is asked from
    /// the fee rate provider.
    pub fee_rate: Option<FeeRate>,
    /// Block window asked to the fee rate provider.
    pub fee_rate_block_range: Option<u64>,
    /// Cap on the fee rate returned by the provider.
    pub max_fee_rate: Option<FeeRate>,
    /// Whether new inputs may be collected. When `false` the current inputs must pay for
    /// everything.
    pub should_add_inputs: bool,
    /// Rounds before giving up with [`BalanceError::FeeNotConverged`].
    pub max_fee_iterations: usize,
}

impl Default for CompleteFeeOptions {
    fn default() -> Self {
        CompleteFeeOptions::from(&Config::default())
    }
}

impl From<&Config> for CompleteFeeOptions {
    fn from(config: &Config) -> Self {
        CompleteFeeOptions {
            fee_rate: config.fee_rate,
            fee_rate_block_range: config.fee_rate_block_range,
            max_fee_rate: config.max_fee_rate,
            should_add_inputs: config.should_add_inputs,
            max_fee_iterations: config.max_fee_iterations,
        }
    }
}

/// What a round ended with.
enum Round {
    /// The copy pays its fee exactly.
    Committed { tx: Transaction, has_change: bool },
    /// The change function needs this much more capacity.
    NeedsExtra(Capacity),
    /// The change grew the transaction to this fee.
    FeeGrown(Capacity),
}

/// Pays the fee of `tx` at `fee_rate`, collecting inputs from `from` and handing the leftover to
/// `change`.
///
/// `change` gets the transaction and the capacity left after the fee, in shannons. The leftover
/// is negative when the inputs don't cover the fee yet. `change` either settles all of it, by
/// growing or shrinking an output or adding one, and returns zero, or returns the capacity it
/// still needs. When `fee_rate` is `None` the options' rate is used. When both are `None` the
/// rate is asked from `from` with the options' block range and cap.
///
/// Returns the number of inputs added and whether the change function took a leftover. `tx` is
/// only updated on success.
pub async fn complete_fee<S, F>(
    tx: &mut Transaction,
    from: &S,
    mut change: F,
    fee_rate: Option<FeeRate>,
    filter: Option<CellFilter>,
    options: &CompleteFeeOptions,
) -> Result<(usize, bool), Error>
where
    S: Signer + ?Sized,
    F: FnMut(&mut Transaction, i128) -> Result<Capacity, Error> + Send,
{
    let fee_rate = match fee_rate.or(options.fee_rate) {
        Some(fee_rate) => fee_rate,
        None => {
            from.get_fee_rate(options.fee_rate_block_range, options.max_fee_rate)
                .await?
        }
    };
    // caches the spent cells on the caller's inputs
    inputs_capacity(tx, from).await?;

    let mut least_fee: Option<Capacity> = None;
    let mut least_extra = Capacity::zero();
    for round in 0..options.max_fee_iterations {
        let mut candidate = tx.clone();
        let target = least_fee
            .unwrap_or_default()
            .safe_add(least_extra)
            .map_err(TransactionError::from)?;
        trace!("fee round {}, target {} shannons", round, target);

        let collected = if options.should_add_inputs {
            complete_inputs_by_capacity(&mut candidate, from, target, filter.clone())
                .await
                .map_err(|err| mark_for_change(err, !least_extra.is_zero()))?
        } else {
            let shortfall = i128::from(target.as_u64()) - signed_fee(&mut candidate, from).await?;
            if shortfall > 0 {
                return Err(insufficient(shortfall, !least_extra.is_zero()));
            }
            0
        };

        let mut candidate = from.prepare_transaction(candidate).await?;
        let least = *least_fee
            .get_or_insert_with(|| Capacity::shannons(candidate.estimate_fee(fee_rate)));

        let outcome = settle(&mut candidate, from, &mut change, least, fee_rate).await?;
        match outcome {
            Round::Committed { tx: settled, has_change } => {
                debug!(
                    "fee settled at {} shannons after {} rounds, {} inputs added, change: {}",
                    least,
                    round + 1,
                    collected,
                    has_change
                );
                tx.copy_from(&settled);
                return Ok((collected, has_change));
            }
            Round::NeedsExtra(extra) => {
                trace!("change needs {} more shannons", extra);
                least_extra = extra;
            }
            Round::FeeGrown(fee) => {
                trace!("change grew the fee from {} to {} shannons", least, fee);
                least_fee = Some(fee);
            }
        }
    }
    Err(BalanceError::FeeNotConverged(options.max_fee_iterations).into())
}

async fn settle<S, F>(
    candidate: &mut Transaction,
    from: &S,
    change: &mut F,
    least_fee: Capacity,
    fee_rate: FeeRate,
) -> Result<Round, Error>
where
    S: Signer + ?Sized,
    F: FnMut(&mut Transaction, i128) -> Result<Capacity, Error> + Send,
{
    let least = i128::from(least_fee.as_u64());
    let fee = signed_fee(candidate, from).await?;
    if fee == least {
        return Ok(Round::Committed {
            tx: candidate.clone(),
            has_change: false,
        });
    }

    let needed = change(candidate, fee - least)?;
    if !needed.is_zero() {
        return Ok(Round::NeedsExtra(needed));
    }
    if signed_fee(candidate, from).await? != least {
        return Err(BalanceError::ChangeUnderused.into());
    }

    let changed = from.prepare_transaction(candidate.clone()).await?;
    let changed_fee = Capacity::shannons(changed.estimate_fee(fee_rate));
    match changed_fee.cmp(&least_fee) {
        Ordering::Less => Err(BalanceError::ChangeShrankTransaction.into()),
        Ordering::Equal => Ok(Round::Committed {
            tx: changed,
            has_change: true,
        }),
        Ordering::Greater => Ok(Round::FeeGrown(changed_fee)),
    }
}

fn shannons(amount: u128) -> Result<Capacity, Error> {
    u64::try_from(amount)
        .map(Capacity::shannons)
        .map_err(|_| TransactionError::CapacityOverflow.into())
}

fn insufficient(shortfall: i128, for_change: bool) -> Error {
    BalanceError::InsufficientCapacity {
        amount: Capacity::shannons(u64::try_from(shortfall).unwrap_or(u64::MAX)),
        for_change,
    }
    .into()
}

// Marks a capacity shortfall as the one of the change cell.
fn mark_for_change(err: Error, for_change: bool) -> Error {
    match err.downcast_ref::<BalanceError>() {
        Some(BalanceError::InsufficientCapacity { amount, .. }) if for_change => {
            BalanceError::InsufficientCapacity {
                amount: *amount,
                for_change,
            }
            .into()
        }
        _ => err,
    }
}

/// [`complete_fee`] sending the leftover to a new output locked by `change_lock`.
///
/// A leftover too small for the change cell's occupied capacity, a deficit included, asks for
/// that capacity.
pub async fn complete_fee_change_to_lock<S>(
    tx: &mut Transaction,
    from: &S,
    change_lock: &Script,
    fee_rate: Option<FeeRate>,
    filter: Option<CellFilter>,
    options: &CompleteFeeOptions,
) -> Result<(usize, bool), Error>
where
    S: Signer + ?Sized,
{
    let change = |tx: &mut Transaction, leftover: i128| -> Result<Capacity, Error> {
        let change_cell = CellOutput::new(Capacity::zero(), change_lock.clone(), None);
        let occupied = change_cell
            .occupied_capacity(0)
            .map_err(TransactionError::from)?;
        if leftover < i128::from(occupied.as_u64()) {
            return Ok(occupied);
        }
        let capacity = shannons(leftover.unsigned_abs())?;
        tx.add_output(CellOutput { capacity, ..change_cell }, Bytes::new())
            .map_err(TransactionError::from)?;
        Ok(Capacity::zero())
    };
    complete_fee(tx, from, change, fee_rate, filter, options).await
}

/// [`complete_fee`] adding the leftover to the output at `index`.
///
/// A deficit is taken out of that output. An output too small to pay it fails with
/// [`BalanceError::InsufficientCapacity`].
pub async fn complete_fee_change_to_output<S>(
    tx: &mut Transaction,
    from: &S,
    index: usize,
    fee_rate: Option<FeeRate>,
    filter: Option<CellFilter>,
    options: &CompleteFeeOptions,
) -> Result<(usize, bool), Error>
where
    S: Signer + ?Sized,
{
    if index >= tx.outputs.len() {
        return Err(BalanceError::OutputNotFound(index).into());
    }
    let change = move |tx: &mut Transaction, leftover: i128| -> Result<Capacity, Error> {
        let output = tx
            .outputs
            .get_mut(index)
            .ok_or(BalanceError::OutputNotFound(index))?;
        let amount = shannons(leftover.unsigned_abs())?;
        output.capacity = if leftover >= 0 {
            output
                .capacity
                .safe_add(amount)
                .map_err(TransactionError::from)?
        } else {
            output.capacity.safe_sub(amount).map_err(|_| {
                BalanceError::insufficient_capacity(amount.saturating_sub(output.capacity))
            })?
        };
        Ok(Capacity::zero())
    };
    complete_fee(tx, from, change, fee_rate, filter, options).await
}
