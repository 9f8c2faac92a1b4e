mod select;

use crate::prepare_sighash_all_witness;
use async_trait::async_trait;
use ckb_error::Error;
use ckb_traits::{
    CellCollector, CellFilter, CellProvider, CellStream, FeeRateProvider, TransactionPreparer,
};
use ckb_types::{
    bytes::Bytes,
    core::{Byte32, Capacity, Cell, CellOutput, FeeRate, OutPoint, Script, ScriptHashType, Transaction},
};
use futures::StreamExt;
use std::sync::Mutex;

// secp256k1 recoverable signature
pub(crate) const SIGNATURE_LEN: usize = 65;

pub(crate) fn lock() -> Script {
    Script::new(
        Byte32::new([0x9b; 32]),
        ScriptHashType::Type,
        Bytes::from(vec![0x36; 20]),
    )
}

pub(crate) fn other_lock() -> Script {
    Script::new(
        Byte32::new([0x9b; 32]),
        ScriptHashType::Type,
        Bytes::from(vec![0x77; 20]),
    )
}

pub(crate) fn udt_type() -> Script {
    Script::new(
        Byte32::new([0x5e; 32]),
        ScriptHashType::Type,
        Bytes::from(vec![0x22; 32]),
    )
}

pub(crate) fn ckb(amount: u64) -> Capacity {
    Capacity::bytes(amount as usize).unwrap()
}

pub(crate) fn out_point(seed: u8) -> OutPoint {
    let mut tx_hash = [0u8; 32];
    tx_hash[31] = seed;
    OutPoint::new(Byte32::new(tx_hash), 0)
}

/// A plain cell of `amount` CKB locked by [`lock`].
pub(crate) fn capacity_cell(seed: u8, amount: u64) -> Cell {
    Cell::new(
        out_point(seed),
        CellOutput::new(ckb(amount), lock(), None),
        Bytes::new(),
    )
}

/// A 142 CKB cell holding `amount` of [`udt_type`].
pub(crate) fn udt_cell(seed: u8, amount: u128) -> Cell {
    Cell::new(
        out_point(seed),
        CellOutput::new(ckb(142), lock(), Some(udt_type())),
        Bytes::from(amount.to_le_bytes().to_vec()),
    )
}

/// Signs for [`lock`] with a fixed set of live cells.
pub(crate) struct MockSigner {
    pub cells: Vec<Cell>,
    pub fee_rate: FeeRate,
    pub fee_rate_calls: Mutex<Vec<(Option<u64>, Option<FeeRate>)>>,
    pub filters: Mutex<Vec<CellFilter>>,
}

impl MockSigner {
    pub fn new(cells: Vec<Cell>) -> Self {
        MockSigner {
            cells,
            fee_rate: FeeRate::from_u64(1000),
            fee_rate_calls: Mutex::new(Vec::new()),
            filters: Mutex::new(Vec::new()),
        }
    }

    /// `count` cells of 100 CKB.
    pub fn with_capacity_cells(count: u8) -> Self {
        Self::new((0..count).map(|seed| capacity_cell(seed, 100)).collect())
    }

    /// `count` cells of 100 UDT.
    pub fn with_udt_cells(count: u8) -> Self {
        Self::new((0..count).map(|seed| udt_cell(seed, 100)).collect())
    }

    pub fn searches(&self) -> usize {
        self.filters.lock().unwrap().len()
    }
}

#[async_trait]
impl CellProvider for MockSigner {
    async fn get_cell(&self, out_point: &OutPoint) -> Result<Option<Cell>, Error> {
        Ok(self
            .cells
            .iter()
            .find(|cell| &cell.out_point == out_point)
            .cloned())
    }
}

impl CellCollector for MockSigner {
    fn find_cells(&self, filter: CellFilter) -> CellStream<'_> {
        self.filters.lock().unwrap().push(filter.clone());
        let cells = &self.cells;
        async_stream::stream! {
            for cell in cells {
                if filter.matches(cell) {
                    yield Ok::<_, Error>(cell.clone());
                }
            }
        }
        .boxed()
    }
}

#[async_trait]
impl FeeRateProvider for MockSigner {
    async fn get_fee_rate(
        &self,
        block_range: Option<u64>,
        max_fee_rate: Option<FeeRate>,
    ) -> Result<FeeRate, Error> {
        self.fee_rate_calls
            .lock()
            .unwrap()
            .push((block_range, max_fee_rate));
        Ok(self.fee_rate)
    }
}

#[async_trait]
impl TransactionPreparer for MockSigner {
    async fn prepare_transaction(&self, mut tx: Transaction) -> Result<Transaction, Error> {
        prepare_sighash_all_witness(&mut tx, &lock(), SIGNATURE_LEN, self).await?;
        Ok(tx)
    }
}
