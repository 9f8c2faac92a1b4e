use super::{capacity_cell, ckb, lock, out_point, udt_cell, udt_type, MockSigner};
use crate::{
    complete_inputs, complete_inputs_add_one, complete_inputs_all, complete_inputs_at_least_one,
    complete_inputs_by_capacity, complete_inputs_by_udt, inputs_udt_balance, BalanceError,
    Completion,
};
use ckb_error::ErrorKind;
use ckb_traits::CellFilter;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, CellInput, CellOutput, Transaction},
};
use pretty_assertions::assert_eq;
use std::ops::ControlFlow;

fn udt_tx(amounts: &[u128]) -> Transaction {
    let mut tx = Transaction::default();
    for amount in amounts {
        tx.add_output(
            CellOutput::new(Capacity::zero(), lock(), Some(udt_type())),
            Bytes::from(amount.to_le_bytes().to_vec()),
        )
        .unwrap();
    }
    tx
}

fn capacity_tx(amount: u64) -> Transaction {
    let mut tx = Transaction::default();
    tx.add_output(CellOutput::new(ckb(amount), lock(), None), Bytes::new())
        .unwrap();
    tx
}

#[tokio::test]
async fn udt_nothing_to_balance() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = Transaction::default();
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        0
    );
    assert!(tx.inputs.is_empty());
    assert_eq!(signer.searches(), 0);
}

#[tokio::test]
async fn udt_collects_two_cells_for_a_partial_amount() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[150]);
    let added = complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
        .await
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(tx.inputs.len(), 2);
    assert_eq!(
        inputs_udt_balance(&mut tx, &signer, &udt_type())
            .await
            .unwrap(),
        200
    );
    assert_eq!(signer.filters.lock().unwrap()[0], CellFilter::udt(udt_type()));
}

#[tokio::test]
async fn udt_exact_amount_takes_one_cell() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[100]);
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn udt_tweak_adds_to_the_outputs() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[100]);
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 50)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn udt_sums_every_output() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[100, 150]);
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn udt_small_amount_still_takes_two_cells() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[50]);
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        2
    );

    let signer = MockSigner::with_udt_cells(1);
    let mut tx = udt_tx(&[50]);
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn udt_existing_inputs_are_counted() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[150]);
    tx.add_input(CellInput::new(out_point(0), 0));
    tx.add_input(CellInput::new(out_point(1), 0));
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        0
    );
    assert_eq!(signer.searches(), 0);

    let mut tx = udt_tx(&[150]);
    tx.add_input(CellInput::new(out_point(0), 0));
    assert_eq!(
        complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
            .await
            .unwrap(),
        1
    );
    // the already spent cell is skipped
    assert_eq!(tx.inputs[1].previous_output, out_point(1));
}

#[tokio::test]
async fn udt_insufficient_balance() {
    let signer = MockSigner::with_udt_cells(10);
    let mut tx = udt_tx(&[1500]);
    let err = complete_inputs_by_udt(&mut tx, &signer, &udt_type(), 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Balance);
    assert_eq!(
        err.downcast_ref::<BalanceError>(),
        Some(&BalanceError::InsufficientCoin {
            amount: 500,
            type_script: udt_type(),
        })
    );
    assert_eq!(
        format!("{err:#}"),
        "Balance: Insufficient coin, need 500 extra coin"
    );
    // the cells found are kept
    assert_eq!(tx.inputs.len(), 10);
}

#[tokio::test]
async fn capacity_stops_once_covered() {
    let signer = MockSigner::with_capacity_cells(10);
    let mut tx = capacity_tx(150);
    assert_eq!(
        complete_inputs_by_capacity(&mut tx, &signer, Capacity::zero(), None)
            .await
            .unwrap(),
        2
    );
    assert_eq!(tx.inputs.len(), 2);
    assert!(tx.inputs.iter().all(CellInput::is_resolved));
    assert_eq!(
        signer.filters.lock().unwrap().as_slice(),
        &[CellFilter::capacity_only()]
    );
}

#[tokio::test]
async fn capacity_tweak_and_existing_inputs() {
    let signer = MockSigner::with_capacity_cells(10);
    let mut tx = capacity_tx(50);
    tx.add_input(CellInput::new(out_point(3), 0));
    assert_eq!(
        complete_inputs_by_capacity(&mut tx, &signer, Capacity::zero(), None)
            .await
            .unwrap(),
        0
    );
    assert_eq!(signer.searches(), 0);

    assert_eq!(
        complete_inputs_by_capacity(&mut tx, &signer, ckb(100), None)
            .await
            .unwrap(),
        1
    );
    assert_eq!(tx.inputs[1].previous_output, out_point(0));
}

#[tokio::test]
async fn capacity_shortfall_is_exact() {
    let signer = MockSigner::with_capacity_cells(2);
    let mut tx = capacity_tx(250);
    let err = complete_inputs_by_capacity(&mut tx, &signer, Capacity::zero(), None)
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<BalanceError>(),
        Some(&BalanceError::InsufficientCapacity {
            amount: ckb(50),
            for_change: false,
        })
    );
    assert_eq!(
        format!("{err:#}"),
        "Balance: Insufficient CKB, need 50 extra CKB"
    );
    // the cells found are kept
    assert_eq!(tx.inputs.len(), 2);
}

#[tokio::test]
async fn fold_sees_the_collected_cells() {
    let signer = MockSigner::with_capacity_cells(5);
    let mut tx = Transaction::default();
    tx.add_input(CellInput::new(out_point(1), 0));
    let mut seen = Vec::new();
    let completion = complete_inputs(
        &mut tx,
        &signer,
        CellFilter::capacity_only(),
        0usize,
        |acc, cell, index, collected| {
            seen.push((index, collected.len(), cell.out_point.clone()));
            if acc == 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(acc + 1)
            }
        },
    )
    .await
    .unwrap();
    assert_eq!(
        completion,
        Completion {
            added_count: 2,
            accumulated: None,
        }
    );
    assert_eq!(
        seen,
        vec![(0, 1, out_point(0)), (1, 2, out_point(2))]
    );
    let spent: Vec<_> = tx.inputs.iter().map(|input| input.previous_output.clone()).collect();
    assert_eq!(spent, vec![out_point(1), out_point(0), out_point(2)]);
}

#[tokio::test]
async fn exhausted_supply_returns_the_accumulator() {
    let signer = MockSigner::with_capacity_cells(3);
    let mut tx = Transaction::default();
    let completion = complete_inputs(
        &mut tx,
        &signer,
        CellFilter::capacity_only(),
        Capacity::zero(),
        |acc, cell, _, _| ControlFlow::Continue(acc.safe_add(cell.cell_output.capacity).unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(completion.added_count, 3);
    assert_eq!(completion.accumulated, Some(ckb(300)));
}

#[tokio::test]
async fn all_takes_only_matching_cells() {
    let mut cells: Vec<_> = (0..3).map(|seed| capacity_cell(seed, 100)).collect();
    cells.push(udt_cell(3, 100));
    let signer = MockSigner::new(cells);
    let mut tx = Transaction::default();
    assert_eq!(complete_inputs_all(&mut tx, &signer, None).await.unwrap(), 3);
    assert_eq!(
        complete_inputs_all(&mut tx, &signer, Some(CellFilter::udt(udt_type())))
            .await
            .unwrap(),
        1
    );
    assert_eq!(tx.inputs.len(), 4);
}

#[tokio::test]
async fn add_one_and_at_least_one() {
    let signer = MockSigner::with_capacity_cells(2);
    let mut tx = Transaction::default();
    assert_eq!(
        complete_inputs_at_least_one(&mut tx, &signer, None)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        complete_inputs_at_least_one(&mut tx, &signer, None)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        complete_inputs_add_one(&mut tx, &signer, None).await.unwrap(),
        1
    );

    let err = complete_inputs_add_one(&mut tx, &signer, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<BalanceError>(),
        Some(&BalanceError::NoCellAvailable)
    );
    assert_eq!(tx.inputs.len(), 2);
}
