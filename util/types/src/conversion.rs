//! Loose input records.
//!
//! These mirror the camelCase JSON shapes wallets and RPC clients exchange: numbers may be JSON
//! numbers, decimal strings or `0x` hex strings, and byte strings are hex. Every record converts
//! into its entity through [`IntoEntity`], which coerces and validates each field.
//!
//! ```
//! use ckb_types::{conversion::TransactionLoose, core::Transaction, prelude::*};
//!
//! let loose: TransactionLoose = serde_json::from_str(r#"{
//!     "outputs": [{ "lock": { "codeHash": "0x0000000000000000000000000000000000000000000000000000000000000000", "hashType": "type", "args": "0x" } }],
//!     "outputsData": ["0x1234"]
//! }"#).unwrap();
//! let tx: Transaction = loose.into_entity().unwrap();
//! // 8 bytes of capacity, 33 bytes of lock and 2 bytes of data
//! assert_eq!(tx.outputs[0].capacity.as_u64(), 43 * 100_000_000);
//! ```

use crate::{
    bytes::Bytes,
    core::{
        error::EntityError, Byte32, Capacity, Cell, CellDep, CellInput, CellOutput, DepType,
        OutPoint, Script, ScriptHashType, Since, SinceMetric, Transaction, WitnessArgs,
    },
    prelude::IntoEntity,
    utilities::hex,
};
use serde::Deserialize;

/// A number given as a JSON number, a decimal string or a `0x` hex string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NumLoose {
    /// A JSON number.
    Number(u64),
    /// A decimal or `0x` hex string.
    Text(String),
}

impl NumLoose {
    /// Parses the number.
    pub fn to_u128(&self) -> Result<u128, EntityError> {
        match self {
            NumLoose::Number(n) => Ok(u128::from(*n)),
            NumLoose::Text(s) => {
                let parsed = match s.strip_prefix("0x") {
                    Some(digits) => u128::from_str_radix(digits, 16),
                    None => s.parse(),
                };
                parsed.map_err(|_| EntityError::InvalidNumber(s.clone()))
            }
        }
    }

    /// Parses the number and checks it fits `T`.
    pub fn to_num<T: TryFrom<u128>>(&self) -> Result<T, EntityError> {
        let n = self.to_u128()?;
        T::try_from(n).map_err(|_| EntityError::InvalidNumber(n.to_string()))
    }
}

impl From<u64> for NumLoose {
    fn from(n: u64) -> Self {
        NumLoose::Number(n)
    }
}

/// A hash type given by name or by number.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HashTypeLoose {
    /// The serialized byte.
    Number(u8),
    /// One of `data`, `type`, `data1` and `data2`.
    Name(String),
}

impl IntoEntity<ScriptHashType> for HashTypeLoose {
    fn into_entity(self) -> Result<ScriptHashType, EntityError> {
        match self {
            HashTypeLoose::Number(n) => ScriptHashType::try_from(n),
            HashTypeLoose::Name(name) => name.parse(),
        }
    }
}

/// A dep type given by name or by number.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DepTypeLoose {
    /// The serialized byte.
    Number(u8),
    /// `code` or `depGroup`.
    Name(String),
}

impl IntoEntity<DepType> for DepTypeLoose {
    fn into_entity(self) -> Result<DepType, EntityError> {
        match self {
            DepTypeLoose::Number(n) => DepType::try_from(n),
            DepTypeLoose::Name(name) => name.parse(),
        }
    }
}

fn bytes_from(s: &str) -> Result<Bytes, EntityError> {
    hex::decode(s).map(Bytes::from)
}

fn byte32_from(s: &str) -> Result<Byte32, EntityError> {
    s.parse()
}

/// Loose [`Script`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptLoose {
    /// Hex code hash.
    pub code_hash: String,
    /// Hash type.
    pub hash_type: HashTypeLoose,
    /// Hex args.
    pub args: String,
}

impl IntoEntity<Script> for ScriptLoose {
    fn into_entity(self) -> Result<Script, EntityError> {
        Ok(Script::new(
            byte32_from(&self.code_hash)?,
            self.hash_type.into_entity()?,
            bytes_from(&self.args)?,
        ))
    }
}

/// Loose [`OutPoint`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutPointLoose {
    /// Hex transaction hash.
    pub tx_hash: String,
    /// Output index.
    pub index: NumLoose,
}

impl IntoEntity<OutPoint> for OutPointLoose {
    fn into_entity(self) -> Result<OutPoint, EntityError> {
        Ok(OutPoint::new(byte32_from(&self.tx_hash)?, self.index.to_num()?))
    }
}

/// Loose [`CellOutput`]. An omitted capacity is zero.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellOutputLoose {
    /// Capacity in shannons.
    #[serde(default)]
    pub capacity: Option<NumLoose>,
    /// Lock script.
    pub lock: ScriptLoose,
    /// Type script.
    #[serde(default, rename = "type")]
    pub type_: Option<ScriptLoose>,
}

impl IntoEntity<CellOutput> for CellOutputLoose {
    fn into_entity(self) -> Result<CellOutput, EntityError> {
        let capacity = match self.capacity {
            Some(capacity) => Capacity::shannons(capacity.to_num()?),
            None => Capacity::zero(),
        };
        Ok(CellOutput::new(
            capacity,
            self.lock.into_entity()?,
            self.type_.map(IntoEntity::into_entity).transpose()?,
        ))
    }
}

/// Loose [`Cell`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLoose {
    /// Where the cell lives.
    #[serde(alias = "previousOutput")]
    pub out_point: OutPointLoose,
    /// The output.
    pub cell_output: CellOutputLoose,
    /// Hex data.
    #[serde(default)]
    pub output_data: Option<String>,
}

impl IntoEntity<Cell> for CellLoose {
    fn into_entity(self) -> Result<Cell, EntityError> {
        Ok(Cell::new(
            self.out_point.into_entity()?,
            self.cell_output.into_entity()?,
            self.output_data
                .as_deref()
                .map(bytes_from)
                .transpose()?
                .unwrap_or_default(),
        ))
    }
}

/// Loose [`Since`]: either the fields or the packed number.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SinceLoose {
    /// Named fields.
    Fields {
        /// `absolute` or `relative`.
        relative: String,
        /// `blockNumber`, `epoch` or `timestamp`.
        metric: String,
        /// The value.
        value: NumLoose,
    },
    /// The packed number.
    Number(NumLoose),
}

impl IntoEntity<Since> for SinceLoose {
    fn into_entity(self) -> Result<Since, EntityError> {
        match self {
            SinceLoose::Number(num) => Since::from_num(num.to_num()?),
            SinceLoose::Fields {
                relative,
                metric,
                value,
            } => {
                let relative = match relative.as_str() {
                    "absolute" => false,
                    "relative" => true,
                    _ => return Err(EntityError::InvalidSince(relative)),
                };
                let metric = match metric.as_str() {
                    "blockNumber" => SinceMetric::BlockNumber,
                    "epoch" => SinceMetric::Epoch,
                    "timestamp" => SinceMetric::Timestamp,
                    _ => return Err(EntityError::InvalidSince(metric)),
                };
                Since::new(relative, metric, value.to_num()?)
            }
        }
    }
}

/// Loose [`CellInput`]. The spent cell may be given to skip fetching it later.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellInputLoose {
    /// The spent cell.
    #[serde(alias = "outPoint")]
    pub previous_output: OutPointLoose,
    /// Time lock, zero when omitted.
    #[serde(default)]
    pub since: Option<SinceLoose>,
    /// The spent output.
    #[serde(default)]
    pub cell_output: Option<CellOutputLoose>,
    /// Hex data of the spent cell.
    #[serde(default)]
    pub output_data: Option<String>,
}

impl IntoEntity<CellInput> for CellInputLoose {
    fn into_entity(self) -> Result<CellInput, EntityError> {
        let since = match self.since {
            Some(since) => IntoEntity::<Since>::into_entity(since)?.to_num(),
            None => 0,
        };
        let mut input = CellInput::new(self.previous_output.into_entity()?, since);
        if let (Some(output), Some(data)) = (self.cell_output, self.output_data) {
            input.resolve(output.into_entity()?, bytes_from(&data)?);
        }
        Ok(input)
    }
}

/// Loose [`CellDep`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDepLoose {
    /// The dep cell.
    pub out_point: OutPointLoose,
    /// How the dep cell is used.
    pub dep_type: DepTypeLoose,
}

impl IntoEntity<CellDep> for CellDepLoose {
    fn into_entity(self) -> Result<CellDep, EntityError> {
        Ok(CellDep::new(
            self.out_point.into_entity()?,
            self.dep_type.into_entity()?,
        ))
    }
}

/// Loose [`WitnessArgs`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessArgsLoose {
    /// Hex lock payload.
    #[serde(default)]
    pub lock: Option<String>,
    /// Hex input type payload.
    #[serde(default)]
    pub input_type: Option<String>,
    /// Hex output type payload.
    #[serde(default)]
    pub output_type: Option<String>,
}

impl IntoEntity<WitnessArgs> for WitnessArgsLoose {
    fn into_entity(self) -> Result<WitnessArgs, EntityError> {
        let field = |value: Option<String>| value.as_deref().map(bytes_from).transpose();
        Ok(WitnessArgs {
            lock: field(self.lock)?,
            input_type: field(self.input_type)?,
            output_type: field(self.output_type)?,
        })
    }
}

/// Loose [`Transaction`]. Every field may be omitted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionLoose {
    /// Version, zero when omitted.
    pub version: Option<NumLoose>,
    /// Cell deps.
    pub cell_deps: Vec<CellDepLoose>,
    /// Hex header hashes.
    pub header_deps: Vec<String>,
    /// Inputs.
    pub inputs: Vec<CellInputLoose>,
    /// Outputs, a zero or omitted capacity is computed from the output data.
    pub outputs: Vec<CellOutputLoose>,
    /// Hex output data.
    pub outputs_data: Vec<String>,
    /// Hex witnesses.
    pub witnesses: Vec<String>,
}

impl IntoEntity<Transaction> for TransactionLoose {
    fn into_entity(self) -> Result<Transaction, EntityError> {
        let mut outputs_data = self
            .outputs_data
            .iter()
            .map(|data| bytes_from(data))
            .collect::<Result<Vec<_>, _>>()?;
        if outputs_data.len() < self.outputs.len() {
            outputs_data.resize(self.outputs.len(), Bytes::new());
        }
        let outputs = self
            .outputs
            .into_iter()
            .zip(outputs_data.iter())
            .map(|(output, data)| {
                let output: CellOutput = output.into_entity()?;
                output
                    .with_auto_capacity(data.len())
                    .map_err(|_| EntityError::CapacityOverflow)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Transaction {
            version: match self.version {
                Some(version) => version.to_num()?,
                None => 0,
            },
            cell_deps: self
                .cell_deps
                .into_iter()
                .map(IntoEntity::into_entity)
                .collect::<Result<_, _>>()?,
            header_deps: self
                .header_deps
                .iter()
                .map(|hash| byte32_from(hash))
                .collect::<Result<_, _>>()?,
            inputs: self
                .inputs
                .into_iter()
                .map(IntoEntity::into_entity)
                .collect::<Result<_, _>>()?,
            outputs,
            outputs_data,
            witnesses: self
                .witnesses
                .iter()
                .map(|witness| bytes_from(witness))
                .collect::<Result<_, _>>()?,
        })
    }
}
