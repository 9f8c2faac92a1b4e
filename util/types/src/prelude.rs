//! This module includes several traits.
//!
//! Few traits are re-exported from other crates, few are used as aliases and others are syntactic
//! sugar.

use crate::{
    bytes::Bytes,
    core::{error::EntityError, Byte32},
    packed,
};
use ckb_hash::blake2b_256;
use ckb_molecule_compiler::Value;

/// A value with a layout in the blockchain schema.
pub trait Entity: Sized {
    /// The declaration name in the blockchain schema.
    const SCHEMA: &'static str;

    /// Converts into the dynamic value the codec encodes.
    fn to_value(&self) -> Value;

    /// Converts from a value produced by the codec.
    fn from_value(value: Value) -> Result<Self, EntityError>;

    /// Serializes through the compiled codec.
    fn to_bytes(&self) -> Bytes {
        packed::codec(Self::SCHEMA)
            .encode(&self.to_value())
            .expect("entity values always match their schema layout")
    }

    /// Deserializes through the compiled codec.
    fn from_bytes(data: &[u8]) -> Result<Self, EntityError> {
        let value = packed::codec(Self::SCHEMA).decode(data)?;
        Self::from_value(value)
    }

    /// Hashes the serialized bytes.
    fn calc_hash(&self) -> Byte32 {
        Byte32::new(blake2b_256(self.to_bytes()))
    }
}

/// Conversion from loose input into an entity.
///
/// Entities convert into themselves unchanged; loose records (see [`crate::conversion`]) coerce
/// every field and validate the result.
pub trait IntoEntity<T> {
    /// Performs the conversion.
    fn into_entity(self) -> Result<T, EntityError>;
}

macro_rules! impl_into_entity_identity {
    ($($entity:ty),* $(,)?) => {
        $(
            impl IntoEntity<$entity> for $entity {
                fn into_entity(self) -> Result<$entity, EntityError> {
                    Ok(self)
                }
            }
        )*
    };
}

impl_into_entity_identity!(
    crate::core::Script,
    crate::core::OutPoint,
    crate::core::CellOutput,
    crate::core::Cell,
    crate::core::CellInput,
    crate::core::CellDep,
    crate::core::WitnessArgs,
    crate::core::Since,
    crate::core::Transaction,
);

/// Reads the fields of a decoded record.
pub(crate) struct RecordReader {
    entity: &'static str,
    value: Value,
}

impl RecordReader {
    pub(crate) fn new(entity: &'static str, value: Value) -> Self {
        RecordReader { entity, value }
    }

    fn malformed(&self, field: &'static str) -> EntityError {
        EntityError::Malformed {
            entity: self.entity,
            field,
        }
    }

    pub(crate) fn take(&mut self, field: &'static str) -> Result<Value, EntityError> {
        self.value
            .take_field(field)
            .ok_or_else(|| self.malformed(field))
    }

    pub(crate) fn bytes(&mut self, field: &'static str) -> Result<Bytes, EntityError> {
        match self.take(field)? {
            Value::Bytes(bytes) => Ok(bytes),
            _ => Err(self.malformed(field)),
        }
    }

    pub(crate) fn byte32(&mut self, field: &'static str) -> Result<Byte32, EntityError> {
        let bytes = self.bytes(field)?;
        Byte32::from_slice(&bytes)
    }

    pub(crate) fn byte(&mut self, field: &'static str) -> Result<u8, EntityError> {
        let value = self.take(field)?;
        value.as_byte().ok_or_else(|| self.malformed(field))
    }

    pub(crate) fn number<T: TryFrom<u128>>(&mut self, field: &'static str) -> Result<T, EntityError> {
        let value = self.take(field)?;
        value
            .as_number()
            .and_then(|number| T::try_from(number).ok())
            .ok_or_else(|| self.malformed(field))
    }

    pub(crate) fn option(&mut self, field: &'static str) -> Result<Option<Value>, EntityError> {
        match self.take(field)? {
            Value::Option(inner) => Ok(inner.map(|value| *value)),
            _ => Err(self.malformed(field)),
        }
    }

    pub(crate) fn bytes_opt(&mut self, field: &'static str) -> Result<Option<Bytes>, EntityError> {
        match self.option(field)? {
            None => Ok(None),
            Some(Value::Bytes(bytes)) => Ok(Some(bytes)),
            Some(_) => Err(self.malformed(field)),
        }
    }

    pub(crate) fn list(&mut self, field: &'static str) -> Result<Vec<Value>, EntityError> {
        match self.take(field)? {
            Value::List(items) => Ok(items),
            _ => Err(self.malformed(field)),
        }
    }

    pub(crate) fn entity<T: Entity>(&mut self, field: &'static str) -> Result<T, EntityError> {
        T::from_value(self.take(field)?)
    }

    pub(crate) fn entities<T: Entity>(&mut self, field: &'static str) -> Result<Vec<T>, EntityError> {
        self.list(field)?.into_iter().map(T::from_value).collect()
    }
}
