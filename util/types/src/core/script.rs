use crate::{
    bytes::Bytes,
    core::{error::EntityError, Byte32, Capacity, CapacityResult, ScriptHashType},
    prelude::{Entity, RecordReader},
};
use ckb_molecule_compiler::Value;

/// A lock or type script.
///
/// Two scripts are equal when their code hash, hash type and args are all equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Script {
    /// Hash identifying the script code.
    pub code_hash: Byte32,
    /// How `code_hash` is matched.
    pub hash_type: ScriptHashType,
    /// Arguments passed to the script.
    pub args: Bytes,
}

impl Script {
    /// Creates a script.
    pub fn new(code_hash: Byte32, hash_type: ScriptHashType, args: Bytes) -> Self {
        Script {
            code_hash,
            hash_type,
            args,
        }
    }

    /// Bytes counted against the capacity of a cell carrying this script.
    pub fn occupied_size(&self) -> usize {
        32 + 1 + self.args.len()
    }

    /// Capacity taken by [`Script::occupied_size`].
    pub fn occupied_capacity(&self) -> CapacityResult<Capacity> {
        Capacity::bytes(self.occupied_size())
    }

    /// Whether `other` runs the same code, ignoring args.
    pub fn same_code(&self, other: &Script) -> bool {
        self.code_hash == other.code_hash && self.hash_type == other.hash_type
    }

    /// The script hash, the blake2b digest of the serialized script.
    pub fn calc_script_hash(&self) -> Byte32 {
        self.calc_hash()
    }
}

impl Entity for Script {
    const SCHEMA: &'static str = "Script";

    fn to_value(&self) -> Value {
        Value::record([
            ("code_hash", Value::from(self.code_hash)),
            ("hash_type", Value::Byte(self.hash_type.into())),
            ("args", Value::from(self.args.clone())),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        Ok(Script {
            code_hash: reader.byte32("code_hash")?,
            hash_type: ScriptHashType::try_from(reader.byte("hash_type")?)?,
            args: reader.bytes("args")?,
        })
    }
}
