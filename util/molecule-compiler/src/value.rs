use bytes::Bytes;

/// A dynamically typed value flowing through a compiled codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A single `byte`.
    Byte(u8),
    /// A little-endian unsigned integer, from `Uint8` up to `Uint128`.
    Number(u128),
    /// Raw bytes of a byte array or a byte vector.
    Bytes(Bytes),
    /// Items of an array or a vector.
    List(Vec<Value>),
    /// An option.
    Option(Option<Box<Value>>),
    /// A union variant selected by item type name.
    Union {
        /// Item type name.
        item: String,
        /// Item value.
        value: Box<Value>,
    },
    /// Fields of a struct or table, in any order.
    Record(Vec<(String, Value)>),
}

impl Value {
    /// The shape name used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Byte(_) => "byte",
            Value::Number(_) => "number",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Option(_) => "option",
            Value::Union { .. } => "union",
            Value::Record(_) => "record",
        }
    }

    /// An absent option.
    pub fn none() -> Self {
        Value::Option(None)
    }

    /// A present option.
    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    /// A union variant.
    pub fn union<S: Into<String>>(item: S, value: Value) -> Self {
        Value::Union {
            item: item.into(),
            value: Box::new(value),
        }
    }

    /// A record from `(name, value)` pairs.
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Takes a field out of a record by name.
    pub fn take_field(&mut self, name: &str) -> Option<Value> {
        match self {
            Value::Record(fields) => fields
                .iter()
                .position(|(field, _)| field == name)
                .map(|index| fields.remove(index).1),
            _ => None,
        }
    }

    /// The byte payload, if this is a byte value.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The number, if this is a number value.
    pub fn as_number(&self) -> Option<u128> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// The byte, if this is a byte value.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(byte) => Some(*byte),
            _ => None,
        }
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(bytes))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Option(value.map(|value| Box::new(value.into())))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
