use crate::{
    bytes::Bytes,
    core::{error::EntityError, Byte32, Capacity, CapacityResult, DepType, Script},
    prelude::{Entity, RecordReader},
};
use ckb_molecule_compiler::Value;
use std::fmt;

/// Points at an output of a committed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    /// Hash of the transaction holding the output.
    pub tx_hash: Byte32,
    /// Index of the output.
    pub index: u32,
}

impl OutPoint {
    /// Creates an out point.
    pub fn new(tx_hash: Byte32, index: u32) -> Self {
        OutPoint { tx_hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

impl Entity for OutPoint {
    const SCHEMA: &'static str = "OutPoint";

    fn to_value(&self) -> Value {
        Value::record([
            ("tx_hash", Value::from(self.tx_hash)),
            ("index", Value::Number(u128::from(self.index))),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        Ok(OutPoint {
            tx_hash: reader.byte32("tx_hash")?,
            index: reader.number("index")?,
        })
    }
}

/// A cell output without its data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellOutput {
    /// Capacity held by the cell.
    pub capacity: Capacity,
    /// Guards spending.
    pub lock: Script,
    /// Guards the cell data, if any.
    pub type_: Option<Script>,
}

impl CellOutput {
    /// Creates an output.
    pub fn new(capacity: Capacity, lock: Script, type_: Option<Script>) -> Self {
        CellOutput {
            capacity,
            lock,
            type_,
        }
    }

    /// Bytes of the output itself counted against its capacity.
    pub fn occupied_size(&self) -> usize {
        8 + self.lock.occupied_size() + self.type_.as_ref().map_or(0, Script::occupied_size)
    }

    /// Capacity needed to hold this output together with `data_len` bytes of data.
    pub fn occupied_capacity(&self, data_len: usize) -> CapacityResult<Capacity> {
        Capacity::bytes(self.occupied_size() + data_len)
    }

    /// Capacity left after storing `data_len` bytes of data, floored at zero.
    pub fn margin(&self, data_len: usize) -> CapacityResult<Capacity> {
        Ok(self
            .capacity
            .saturating_sub(self.occupied_capacity(data_len)?))
    }

    /// Fills a zero capacity with the occupied capacity for `data_len` bytes of data.
    ///
    /// A non-zero capacity is kept as is.
    pub fn with_auto_capacity(mut self, data_len: usize) -> CapacityResult<Self> {
        if self.capacity.is_zero() {
            self.capacity = self.occupied_capacity(data_len)?;
        }
        Ok(self)
    }
}

impl Entity for CellOutput {
    const SCHEMA: &'static str = "CellOutput";

    fn to_value(&self) -> Value {
        Value::record([
            ("capacity", Value::Number(u128::from(self.capacity.as_u64()))),
            ("lock", self.lock.to_value()),
            ("type_", Value::from(self.type_.as_ref().map(Script::to_value))),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        Ok(CellOutput {
            capacity: Capacity::shannons(reader.number("capacity")?),
            lock: reader.entity("lock")?,
            type_: reader
                .option("type_")?
                .map(Script::from_value)
                .transpose()?,
        })
    }
}

/// A live cell: where it is, what it holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Where the cell lives.
    pub out_point: OutPoint,
    /// The cell output.
    pub cell_output: CellOutput,
    /// The cell data.
    pub output_data: Bytes,
}

impl Cell {
    /// Creates a cell.
    pub fn new(out_point: OutPoint, cell_output: CellOutput, output_data: Bytes) -> Self {
        Cell {
            out_point,
            cell_output,
            output_data,
        }
    }

    /// Bytes of the output and its data counted against the capacity.
    pub fn occupied_size(&self) -> usize {
        self.cell_output.occupied_size() + self.output_data.len()
    }

    /// Capacity not needed to keep the cell alive.
    pub fn capacity_free(&self) -> CapacityResult<Capacity> {
        self.cell_output
            .capacity
            .safe_sub(Capacity::bytes(self.occupied_size())?)
    }
}

/// The spent cell cached on an input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PreviousCell {
    /// Not fetched yet.
    #[default]
    Unresolved,
    /// Fetched once, never refetched.
    Resolved {
        /// The spent output.
        output: CellOutput,
        /// Its data.
        data: Bytes,
    },
}

/// A transaction input.
///
/// Only `previous_output` and `since` are serialized; the spent cell is a cache filled by
/// [`CellInput::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellInput {
    /// The spent cell.
    pub previous_output: OutPoint,
    /// Time lock, see [`Since`](crate::core::Since).
    pub since: u64,
    /// Cached spent cell.
    pub cell: PreviousCell,
}

impl CellInput {
    /// An unresolved input.
    pub fn new(previous_output: OutPoint, since: u64) -> Self {
        CellInput {
            previous_output,
            since,
            cell: PreviousCell::Unresolved,
        }
    }

    /// Whether the spent cell is cached.
    pub fn is_resolved(&self) -> bool {
        matches!(self.cell, PreviousCell::Resolved { .. })
    }

    /// Caches the spent cell, doing nothing if it is already cached.
    pub fn resolve(&mut self, output: CellOutput, data: Bytes) {
        if !self.is_resolved() {
            self.cell = PreviousCell::Resolved { output, data };
        }
    }

    /// The cached spent output.
    pub fn cell_output(&self) -> Option<&CellOutput> {
        match &self.cell {
            PreviousCell::Resolved { output, .. } => Some(output),
            PreviousCell::Unresolved => None,
        }
    }

    /// The cached spent cell.
    pub fn cell(&self) -> Option<Cell> {
        match &self.cell {
            PreviousCell::Resolved { output, data } => Some(Cell::new(
                self.previous_output.clone(),
                output.clone(),
                data.clone(),
            )),
            PreviousCell::Unresolved => None,
        }
    }
}

impl From<Cell> for CellInput {
    fn from(cell: Cell) -> Self {
        CellInput {
            previous_output: cell.out_point,
            since: 0,
            cell: PreviousCell::Resolved {
                output: cell.cell_output,
                data: cell.output_data,
            },
        }
    }
}

impl Entity for CellInput {
    const SCHEMA: &'static str = "CellInput";

    fn to_value(&self) -> Value {
        Value::record([
            ("since", Value::Number(u128::from(self.since))),
            ("previous_output", self.previous_output.to_value()),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        let since = reader.number("since")?;
        Ok(CellInput::new(reader.entity("previous_output")?, since))
    }
}

/// A cell providing code or data to the scripts of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellDep {
    /// The dep cell.
    pub out_point: OutPoint,
    /// How the dep cell is used.
    pub dep_type: DepType,
}

impl CellDep {
    /// Creates a cell dep.
    pub fn new(out_point: OutPoint, dep_type: DepType) -> Self {
        CellDep {
            out_point,
            dep_type,
        }
    }
}

impl Entity for CellDep {
    const SCHEMA: &'static str = "CellDep";

    fn to_value(&self) -> Value {
        Value::record([
            ("out_point", self.out_point.to_value()),
            ("dep_type", Value::Byte(self.dep_type.into())),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        Ok(CellDep {
            out_point: reader.entity("out_point")?,
            dep_type: DepType::try_from(reader.byte("dep_type")?)?,
        })
    }
}
