use crate::{
    bytes::Bytes,
    core::error::EntityError,
    prelude::{Entity, RecordReader},
};
use ckb_molecule_compiler::Value;

/// The structured witness most lock scripts expect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WitnessArgs {
    /// Lock script payload, usually a signature.
    pub lock: Option<Bytes>,
    /// Payload for the input type script.
    pub input_type: Option<Bytes>,
    /// Payload for the output type script.
    pub output_type: Option<Bytes>,
}

impl WitnessArgs {
    /// Witness args with only a lock.
    pub fn with_lock(lock: Bytes) -> Self {
        WitnessArgs {
            lock: Some(lock),
            ..Default::default()
        }
    }
}

impl Entity for WitnessArgs {
    const SCHEMA: &'static str = "WitnessArgs";

    fn to_value(&self) -> Value {
        Value::record([
            ("lock", Value::from(self.lock.clone())),
            ("input_type", Value::from(self.input_type.clone())),
            ("output_type", Value::from(self.output_type.clone())),
        ])
    }

    fn from_value(value: Value) -> Result<Self, EntityError> {
        let mut reader = RecordReader::new(Self::SCHEMA, value);
        Ok(WitnessArgs {
            lock: reader.bytes_opt("lock")?,
            input_type: reader.bytes_opt("input_type")?,
            output_type: reader.bytes_opt("output_type")?,
        })
    }
}
