//! Input selection.
//!
//! Every selection pulls cells lazily from a [`CellCollector`] and stops as soon as its target is
//! met, so a selection never asks for more cells than it adds.

use crate::{
    error::BalanceError,
    lookup::{inputs_capacity, inputs_udt_balance_and_count},
};
use ckb_error::Error;
use ckb_traits::{CellCollector, CellFilter, CellProvider};
use ckb_types::{
    core::{error::TransactionError, Capacity, Cell, CellInput, Script, Transaction},
    utilities::udt_balance,
};
use futures::TryStreamExt;
use log::debug;
use std::ops::ControlFlow;

/// Outcome of [`complete_inputs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion<T> {
    /// Inputs appended to the transaction.
    pub added_count: usize,
    /// The last accumulator when the cells ran out before the fold broke, `None` when it broke.
    pub accumulated: Option<T>,
}

/// Appends cells found with `filter` as inputs until `fold` breaks or no cell is left.
///
/// `fold` gets the accumulator, the new cell, its index among the collected cells and every cell
/// collected so far, the new one included. Cells already spent by an input are skipped. All
/// collected cells are appended, the one `fold` broke on included, in the order they were found.
pub async fn complete_inputs<C, T, F>(
    tx: &mut Transaction,
    from: &C,
    filter: CellFilter,
    init: T,
    mut fold: F,
) -> Result<Completion<T>, Error>
where
    C: CellCollector + ?Sized,
    F: FnMut(T, &Cell, usize, &[Cell]) -> ControlFlow<(), T>,
{
    let mut cells = from.find_cells(filter);
    let mut collected: Vec<Cell> = Vec::new();
    let mut acc = init;
    let accumulated = loop {
        let cell = match cells.try_next().await? {
            Some(cell) => cell,
            None => break Some(acc),
        };
        let spent = tx
            .inputs
            .iter()
            .map(|input| &input.previous_output)
            .chain(collected.iter().map(|cell| &cell.out_point))
            .any(|out_point| out_point == &cell.out_point);
        if spent {
            continue;
        }
        collected.push(cell);
        let index = collected.len() - 1;
        match fold(acc, &collected[index], index, &collected) {
            ControlFlow::Continue(next) => acc = next,
            ControlFlow::Break(()) => break None,
        }
    };

    let added_count = collected.len();
    debug!(
        "collected {} cells, exhausted: {}",
        added_count,
        accumulated.is_some()
    );
    for cell in collected {
        tx.add_input(CellInput::from(cell));
    }
    Ok(Completion {
        added_count,
        accumulated,
    })
}

/// Adds plain capacity cells until the inputs cover the outputs plus `capacity_tweak`.
///
/// `filter` defaults to [`CellFilter::capacity_only`]. Returns the number of inputs added.
///
/// When the cells run out first this fails with [`BalanceError::InsufficientCapacity`], and the
/// cells collected until then stay appended to `tx`.
pub async fn complete_inputs_by_capacity<S>(
    tx: &mut Transaction,
    from: &S,
    capacity_tweak: Capacity,
    filter: Option<CellFilter>,
) -> Result<usize, Error>
where
    S: CellProvider + CellCollector + ?Sized,
{
    let expected = tx
        .outputs_capacity()
        .and_then(|outputs| outputs.safe_add(capacity_tweak))
        .map_err(TransactionError::from)?;
    let inputs = inputs_capacity(tx, from).await?;
    if inputs >= expected {
        return Ok(0);
    }

    let expected = expected.as_u64();
    let completion = complete_inputs(
        tx,
        from,
        filter.unwrap_or_else(CellFilter::capacity_only),
        inputs.as_u64(),
        |acc, cell, _, _| {
            let sum = acc.saturating_add(cell.cell_output.capacity.as_u64());
            if sum >= expected {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(sum)
            }
        },
    )
    .await?;

    match completion.accumulated {
        None => Ok(completion.added_count),
        Some(accumulated) => Err(BalanceError::insufficient_capacity(Capacity::shannons(
            expected - accumulated,
        ))
        .into()),
    }
}

/// Adds UDT cells until the inputs hold the balance of the outputs plus `balance_tweak`.
///
/// Selection stops on an exact match. Otherwise it goes on until the transaction has at least two
/// inputs of the UDT, so the leftover can go into an existing change output instead of a new
/// cell. When the cells run out with the balance covered, the inputs found are kept.
///
/// When they run out short of the balance this fails with [`BalanceError::InsufficientCoin`], and
/// the cells collected until then stay appended to `tx`.
pub async fn complete_inputs_by_udt<S>(
    tx: &mut Transaction,
    from: &S,
    type_script: &Script,
    balance_tweak: u128,
) -> Result<usize, Error>
where
    S: CellProvider + CellCollector + ?Sized,
{
    let expected = tx
        .outputs_udt_balance(type_script)
        .saturating_add(balance_tweak);
    if expected == 0 {
        return Ok(0);
    }

    let (inputs_balance, inputs_count) =
        inputs_udt_balance_and_count(tx, from, type_script).await?;
    if inputs_balance == expected || (inputs_balance >= expected && inputs_count >= 2) {
        return Ok(0);
    }

    let completion = complete_inputs(
        tx,
        from,
        CellFilter::udt(type_script.clone()),
        inputs_balance,
        |acc, cell, _, collected| {
            let sum = acc.saturating_add(udt_balance(&cell.output_data));
            if sum == expected || (sum >= expected && inputs_count + collected.len() >= 2) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(sum)
            }
        },
    )
    .await?;

    match completion.accumulated {
        Some(accumulated) if accumulated < expected => Err(BalanceError::InsufficientCoin {
            amount: expected - accumulated,
            type_script: type_script.clone(),
        }
        .into()),
        _ => Ok(completion.added_count),
    }
}

/// Adds every cell found with `filter`, [`CellFilter::capacity_only`] by default.
pub async fn complete_inputs_all<C>(
    tx: &mut Transaction,
    from: &C,
    filter: Option<CellFilter>,
) -> Result<usize, Error>
where
    C: CellCollector + ?Sized,
{
    let completion = complete_inputs(
        tx,
        from,
        filter.unwrap_or_else(CellFilter::capacity_only),
        (),
        |_, _, _, _| ControlFlow::Continue(()),
    )
    .await?;
    Ok(completion.added_count)
}

/// Adds one new cell found with `filter`, [`CellFilter::capacity_only`] by default.
pub async fn complete_inputs_add_one<C>(
    tx: &mut Transaction,
    from: &C,
    filter: Option<CellFilter>,
) -> Result<usize, Error>
where
    C: CellCollector + ?Sized,
{
    let completion = complete_inputs(
        tx,
        from,
        filter.unwrap_or_else(CellFilter::capacity_only),
        (),
        |_, _, _, _| ControlFlow::Break(()),
    )
    .await?;
    match completion.accumulated {
        None => Ok(completion.added_count),
        Some(()) => Err(BalanceError::NoCellAvailable.into()),
    }
}

/// Like [`complete_inputs_add_one`], but only when the transaction has no input yet.
pub async fn complete_inputs_at_least_one<C>(
    tx: &mut Transaction,
    from: &C,
    filter: Option<CellFilter>,
) -> Result<usize, Error>
where
    C: CellCollector + ?Sized,
{
    if !tx.inputs.is_empty() {
        return Ok(0);
    }
    complete_inputs_add_one(tx, from, filter).await
}
