use crate::{
    bytes::Bytes,
    core::{
        error::EntityError,
        Byte32, Capacity, CapacityResult, CellDep, CellInput, CellOutput, FeeRate, Script,
        Version, WitnessArgs,
    },
    packed,
    prelude::{Entity, RecordReader},
    utilities::udt_balance,
};
use ckb_hash::{blake2b_256, new_blake2b, Blake2b};
use ckb_molecule_compiler::Value;

/// Bytes added to the serialized size when estimating fees, the offset a block spends on each
/// transaction.
pub const TX_SIZE_OFFSET: usize = 4;

/// The digest to sign for a lock and the witness to hold the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignHashInfo {
    /// The digest.
    pub message: Byte32,
    /// Index of the witness of the first input locked by the lock.
    pub position: usize,
}

/// A CKB transaction.
///
/// `outputs_data[i]` belongs to `outputs[i]`. Missing entries read as empty data and entries past
/// the last output are kept as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction version.
    pub version: Version,
    /// Cells providing code and data.
    pub cell_deps: Vec<CellDep>,
    /// Block headers readable by scripts.
    pub header_deps: Vec<Byte32>,
    /// Spent cells.
    pub inputs: Vec<CellInput>,
    /// Created cells.
    pub outputs: Vec<CellOutput>,
    /// Data of the created cells.
    pub outputs_data: Vec<Bytes>,
    /// Unsigned payloads, usually one [`WitnessArgs`] per input.
    pub witnesses: Vec<Bytes>,
}

impl Transaction {
    /// The `RawTransaction` value, everything but the witnesses.
    pub fn raw_value(&self) -> Value {
        Value::record([
            ("version", Value::Number(u128::from(self.version))),
            (
                "cell_deps",
                Value::List(self.cell_deps.iter().map(Entity::to_value).collect()),
            ),
            (
                "header_deps",
                Value::List(self.header_deps.iter().copied().map(Value::from).collect()),
            ),
            (
                "inputs",
                Value::List(self.inputs.iter().map(Entity::to_value).collect()),
            ),
            (
                "outputs",
                Value::List(self.outputs.iter().map(Entity::to_value).collect()),
            ),
            (
                "outputs_data",
                Value::List(self.outputs_data.iter().cloned().map(Value::from).collect()),
            ),
        ])
    }

    /// Serializes the raw transaction.
    pub fn raw_to_bytes(&self) -> Bytes {
        packed::codec("RawTransaction")
            .encode(&self.raw_value())
            .expect("raw transaction values always match their schema layout")
    }

    /// The transaction hash, computed over the raw transaction.
    pub fn hash(&self) -> Byte32 {
        Byte32::new(blake2b_256(self.raw_to_bytes()))
    }

    /// The hash of the full serialization, witnesses included.
    pub fn hash_full(&self) -> Byte32 {
        self.calc_hash()
    }

    /// Length of the full serialization.
    pub fn serialized_size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Replaces every field with the ones of `other`.
    pub fn copy_from(&mut self, other: &Transaction) {
        self.clone_from(other);
    }

    /// Appends an input and returns the new input count.
    ///
    /// When witnesses outnumber inputs, an empty witness is inserted at the new input's index so
    /// existing witnesses keep their inputs.
    pub fn add_input(&mut self, input: CellInput) -> usize {
        if self.witnesses.len() > self.inputs.len() {
            self.witnesses.insert(self.inputs.len(), Bytes::new());
        }
        self.inputs.push(input);
        self.inputs.len()
    }

    /// The input at `index`.
    pub fn get_input(&self, index: usize) -> Option<&CellInput> {
        self.inputs.get(index)
    }

    /// The input at `index`, mutably.
    pub fn get_input_mut(&mut self, index: usize) -> Option<&mut CellInput> {
        self.inputs.get_mut(index)
    }

    /// Appends an output with its data and returns the new output count.
    ///
    /// A zero capacity is filled with the occupied capacity of the output and its data.
    pub fn add_output(&mut self, output: CellOutput, data: Bytes) -> CapacityResult<usize> {
        let output = output.with_auto_capacity(data.len())?;
        self.outputs.push(output);
        let len = self.outputs.len();
        self.set_output_data_at(len - 1, data);
        Ok(len)
    }

    /// The output at `index` and its data, empty when missing.
    pub fn get_output(&self, index: usize) -> Option<(&CellOutput, &[u8])> {
        let output = self.outputs.get(index)?;
        let data = self.outputs_data.get(index).map_or(&[][..], |data| &data[..]);
        Some((output, data))
    }

    /// Sets the output data at `index`, padding with empty data.
    pub fn set_output_data_at(&mut self, index: usize, data: Bytes) {
        set_padded(&mut self.outputs_data, index, data);
    }

    /// Sets the witness at `index`, padding with empty witnesses.
    pub fn set_witness_at(&mut self, index: usize, witness: Bytes) {
        set_padded(&mut self.witnesses, index, witness);
    }

    /// Serializes `witness_args` into the witness at `index`.
    pub fn set_witness_args_at(&mut self, index: usize, witness_args: &WitnessArgs) {
        self.set_witness_at(index, witness_args.to_bytes());
    }

    /// Parses the witness at `index`. A missing or empty witness reads as `None`.
    pub fn get_witness_args_at(&self, index: usize) -> Result<Option<WitnessArgs>, EntityError> {
        match self.witnesses.get(index) {
            Some(witness) if !witness.is_empty() => WitnessArgs::from_bytes(witness).map(Some),
            _ => Ok(None),
        }
    }

    /// Puts a zero-filled lock of `lock_len` bytes into the witness args at `index`.
    ///
    /// The other witness args fields are kept, a missing witness starts from the default.
    pub fn set_witness_lock_placeholder(
        &mut self,
        index: usize,
        lock_len: usize,
    ) -> Result<(), EntityError> {
        let mut witness_args = self.get_witness_args_at(index)?.unwrap_or_default();
        witness_args.lock = Some(Bytes::from(vec![0u8; lock_len]));
        self.set_witness_args_at(index, &witness_args);
        Ok(())
    }

    /// Appends cell deps not present yet.
    pub fn add_cell_deps<I: IntoIterator<Item = CellDep>>(&mut self, cell_deps: I) {
        for cell_dep in cell_deps {
            if !self.cell_deps.contains(&cell_dep) {
                self.cell_deps.push(cell_dep);
            }
        }
    }

    /// Prepends cell deps not present yet, one by one, so they end up in reverse order.
    pub fn add_cell_deps_at_start<I: IntoIterator<Item = CellDep>>(&mut self, cell_deps: I) {
        for cell_dep in cell_deps {
            if !self.cell_deps.contains(&cell_dep) {
                self.cell_deps.insert(0, cell_dep);
            }
        }
    }

    /// Appends header deps not present yet.
    pub fn add_header_deps<I: IntoIterator<Item = Byte32>>(&mut self, header_deps: I) {
        for header_dep in header_deps {
            if !self.header_deps.contains(&header_dep) {
                self.header_deps.push(header_dep);
            }
        }
    }

    /// Sum of output capacities.
    pub fn outputs_capacity(&self) -> CapacityResult<Capacity> {
        Capacity::safe_sum(self.outputs.iter().map(|output| output.capacity))
    }

    /// Sum of UDT balances held by outputs typed with `type_script`.
    pub fn outputs_udt_balance(&self, type_script: &Script) -> u128 {
        self.outputs
            .iter()
            .enumerate()
            .filter(|(_, output)| output.type_.as_ref() == Some(type_script))
            .map(|(index, _)| {
                self.outputs_data
                    .get(index)
                    .map_or(0, |data| udt_balance(data))
            })
            .fold(0u128, u128::saturating_add)
    }

    /// The fee, in shannons, this transaction must pay at `fee_rate`.
    pub fn estimate_fee(&self, fee_rate: FeeRate) -> u64 {
        fee_rate.fee(self.serialized_size() + TX_SIZE_OFFSET)
    }

    /// Capacity of the output at `index` not needed to store it with its data.
    ///
    /// A missing output has no margin.
    pub fn output_capacity_margin(&self, index: usize) -> CapacityResult<Capacity> {
        match self.get_output(index) {
            Some((output, data)) => output.margin(data.len()),
            None => Ok(Capacity::zero()),
        }
    }

    /// Computes the sighash-all digest for `lock` over the cached input cells.
    ///
    /// The digest starts from the transaction hash, then covers each witness from the first one
    /// of an input locked by `lock`: the witnesses of those inputs and every witness past the
    /// last input. Returns `None` when no input at a witness index is locked by `lock`.
    /// Unresolved inputs never match.
    pub fn sign_hash_info(&self, lock: &Script) -> Option<SignHashInfo> {
        let mut hasher = new_blake2b();
        hasher.update(self.hash().as_bytes());

        let mut position = None;
        for (index, witness) in self.witnesses.iter().enumerate() {
            if let Some(input) = self.inputs.get(index) {
                if !input
                    .cell_output()
                    .is_some_and(|output| &output.lock == lock)
                {
                    continue;
                }
                position.get_or_insert(index);
            }
            if position.is_none() {
                return None;
            }
            Self::hash_witness_to_hasher(witness, &mut hasher);
        }

        let position = position?;
        let mut message = [0u8; 32];
        hasher.finalize(&mut message);
        Some(SignHashInfo {
            message: Byte32::new(message),
            position,
        })
    }

    /// Feeds a witness into a sighash digest: its length as a little-endian `u64`, then its bytes.
    pub fn hash_witness_to_hasher(witness: &[u8], hasher: &mut Blake2b) {
        hasher.update(&(witness.len() as u64).to_le_bytes());
        hasher.update(witness);
    }
}

fn set_padded(items: &mut Vec<Bytes>, index: usize, item: Bytes) {
    if items.len() <= index {
        items.resize(index + 1, Bytes::new());
    }
    items[index] = item;
}

impl Entity for Transaction {
    const SCHEMA: &'static str = "Transaction";

    fn to_value(&self) -> Value {
        Value::record([
            ("raw", self.raw_value()),
            (
                "witnesses",
                Value::List(self.witnesses.iter().cloned().map(Value::from).collect()),
            ),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        let mut raw = RecordReader::new("RawTransaction", reader.take("raw")?);
        let byte_list = |items: Vec<Value>, entity: &'static str| {
            items
                .into_iter()
                .map(|item| match item {
                    Value::Bytes(bytes) => Ok(bytes),
                    _ => Err(EntityError::Malformed {
                        entity,
                        field: "bytes",
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Transaction {
            version: raw.number("version")?,
            cell_deps: raw.entities("cell_deps")?,
            header_deps: byte_list(raw.list("header_deps")?, "RawTransaction")?
                .iter()
                .map(|hash| Byte32::from_slice(hash))
                .collect::<Result<_, _>>()?,
            inputs: raw.entities("inputs")?,
            outputs: raw.entities("outputs")?,
            outputs_data: byte_list(raw.list("outputs_data")?, "RawTransaction")?,
            witnesses: byte_list(reader.list("witnesses")?, Self::SCHEMA)?,
        })
    }
}
