//! Runtime codecs for the molecule layouts.
//!
//! * `array` and `struct` are fixed-size concatenations.
//! * `fixvec` is a `u32` item count followed by fixed-size items.
//! * `dynvec` and `table` are a `u32` total size, one `u32` offset per item, then the items.
//! * `option` is empty or the inner encoding.
//! * `union` is a `u32` item id followed by the item.
//!
//! All numbers are little-endian.

use crate::{error::CodecError, value::Value};
use bytes::Bytes;
use molecule::{pack_number, unpack_number, Number, NUMBER_SIZE};
use std::sync::Arc;

/// A cheaply clonable handle to a compiled layout.
#[derive(Clone, Debug)]
pub struct Codec {
    kind: Arc<CodecKind>,
    byte_length: Option<usize>,
}

/// The layout behind a [`Codec`].
#[derive(Debug)]
pub enum CodecKind {
    /// A single byte.
    Byte,
    /// A little-endian unsigned integer of the given width.
    Number(usize),
    /// A fixed count of raw bytes.
    ByteArray(usize),
    /// A byte fixvec.
    Bytes,
    /// A fixed count of fixed-size items.
    Array {
        /// Item layout.
        item: Codec,
        /// Item count.
        count: usize,
    },
    /// A vector of fixed-size items.
    FixVec(Codec),
    /// A vector of dynamic-size items.
    DynVec(Codec),
    /// An optional item.
    Option(Codec),
    /// A tagged sum.
    Union(Vec<UnionVariant>),
    /// Fixed-size fields.
    Struct(Vec<(String, Codec)>),
    /// Offset-indexed fields.
    Table(Vec<(String, Codec)>),
}

/// One item of a union layout.
#[derive(Clone, Debug)]
pub struct UnionVariant {
    /// Item type name, used as the variant name of [`Value::Union`].
    pub name: String,
    /// The id written before the item.
    pub id: u32,
    /// Item layout.
    pub codec: Codec,
}

impl Codec {
    fn new(kind: CodecKind, byte_length: Option<usize>) -> Self {
        Codec {
            kind: Arc::new(kind),
            byte_length,
        }
    }

    /// A single byte.
    pub fn byte() -> Self {
        Codec::new(CodecKind::Byte, Some(1))
    }

    /// A little-endian unsigned integer of `width` bytes, at most 16.
    pub fn number(width: usize) -> Self {
        debug_assert!(width > 0 && width <= 16);
        Codec::new(CodecKind::Number(width), Some(width))
    }

    /// `len` raw bytes.
    pub fn byte_array(len: usize) -> Self {
        Codec::new(CodecKind::ByteArray(len), Some(len))
    }

    /// Bytes with a length prefix.
    pub fn bytes() -> Self {
        Codec::new(CodecKind::Bytes, None)
    }

    /// `count` items of `item`, which must be fixed-size.
    pub fn array(item: Codec, count: usize) -> Option<Self> {
        let byte_length = item.byte_length?.checked_mul(count)?;
        Some(Codec::new(
            CodecKind::Array { item, count },
            Some(byte_length),
        ))
    }

    /// A fixvec when `item` is fixed-size, otherwise a dynvec.
    pub fn vector(item: Codec) -> Self {
        if matches!(item.kind(), CodecKind::Byte) {
            Codec::bytes()
        } else if item.is_fixed() {
            Codec::new(CodecKind::FixVec(item), None)
        } else {
            Codec::new(CodecKind::DynVec(item), None)
        }
    }

    /// An optional `inner`.
    pub fn option(inner: Codec) -> Self {
        Codec::new(CodecKind::Option(inner), None)
    }

    /// A union of `variants`.
    pub fn union(variants: Vec<UnionVariant>) -> Self {
        Codec::new(CodecKind::Union(variants), None)
    }

    /// Fixed-size `fields`, `None` if any of them is dynamic-size.
    pub fn structure(fields: Vec<(String, Codec)>) -> Option<Self> {
        let byte_length = fields
            .iter()
            .try_fold(0usize, |sum, (_, codec)| sum.checked_add(codec.byte_length?))?;
        Some(Codec::new(CodecKind::Struct(fields), Some(byte_length)))
    }

    /// Offset-indexed `fields`.
    pub fn table(fields: Vec<(String, Codec)>) -> Self {
        Codec::new(CodecKind::Table(fields), None)
    }

    /// The layout.
    pub fn kind(&self) -> &CodecKind {
        &self.kind
    }

    /// The encoded size when it is fixed.
    pub fn byte_length(&self) -> Option<usize> {
        self.byte_length
    }

    /// Whether every encoding has the same size.
    pub fn is_fixed(&self) -> bool {
        self.byte_length.is_some()
    }

    /// Encodes `value`.
    pub fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        let mut out = Vec::with_capacity(self.byte_length.unwrap_or_default());
        self.encode_to(value, &mut out)?;
        Ok(out.into())
    }

    /// Decodes `data`, rejecting tables that carry extra fields.
    pub fn decode(&self, data: &[u8]) -> Result<Value, CodecError> {
        self.decode_with(data, false)
    }

    /// Decodes `data`, ignoring extra trailing table fields added by newer schemas.
    pub fn decode_compatible(&self, data: &[u8]) -> Result<Value, CodecError> {
        self.decode_with(data, true)
    }

    fn encode_to(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
        match (self.kind(), value) {
            (CodecKind::Byte, Value::Byte(byte)) => out.push(*byte),
            (CodecKind::Number(width), Value::Number(number)) => {
                if *width < 16 && *number >> (8 * *width) != 0 {
                    return Err(CodecError::NumberOverflow {
                        value: *number,
                        width: *width,
                    });
                }
                out.extend_from_slice(&number.to_le_bytes()[..*width]);
            }
            (CodecKind::ByteArray(len), Value::Bytes(bytes)) => {
                if bytes.len() != *len {
                    return Err(CodecError::InvalidSize {
                        codec: "array",
                        expected: *len,
                        actual: bytes.len(),
                    });
                }
                out.extend_from_slice(bytes);
            }
            (CodecKind::Bytes, Value::Bytes(bytes)) => {
                out.extend_from_slice(&pack_number(to_number(bytes.len())?));
                out.extend_from_slice(bytes);
            }
            (CodecKind::Array { item, count }, Value::List(items)) => {
                if items.len() != *count {
                    return Err(CodecError::ItemCount {
                        codec: "array",
                        expected: *count,
                        actual: items.len(),
                    });
                }
                for value in items {
                    item.encode_to(value, out)
                        .map_err(CodecError::nested("array"))?;
                }
            }
            (CodecKind::FixVec(item), Value::List(items)) => {
                out.extend_from_slice(&pack_number(to_number(items.len())?));
                for value in items {
                    item.encode_to(value, out)
                        .map_err(CodecError::nested("fixedItemVec"))?;
                }
            }
            (CodecKind::DynVec(item), Value::List(items)) => {
                let parts = items
                    .iter()
                    .map(|value| item.encode(value))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(CodecError::nested("dynItemVec"))?;
                write_with_offsets(&parts, out)?;
            }
            (CodecKind::Option(_), Value::Option(None)) => {}
            (CodecKind::Option(inner), Value::Option(Some(value))) => {
                inner
                    .encode_to(value, out)
                    .map_err(CodecError::nested("option"))?;
            }
            (CodecKind::Union(variants), Value::Union { item, value }) => {
                let variant = variants
                    .iter()
                    .find(|variant| &variant.name == item)
                    .ok_or_else(|| CodecError::UnknownUnionItem {
                        expected: variant_names(variants),
                        actual: item.clone(),
                    })?;
                out.extend_from_slice(&pack_number(variant.id));
                variant
                    .codec
                    .encode_to(value, out)
                    .map_err(CodecError::nested(format!("union.({item})")))?;
            }
            (CodecKind::Struct(fields), Value::Record(_)) => {
                for (name, codec) in fields {
                    let field = value
                        .field(name)
                        .ok_or_else(|| CodecError::MissingField(name.clone()))?;
                    codec
                        .encode_to(field, out)
                        .map_err(CodecError::nested(format!("struct.{name}")))?;
                }
            }
            (CodecKind::Table(fields), Value::Record(_)) => {
                let mut parts = Vec::with_capacity(fields.len());
                for (name, codec) in fields {
                    let part = match value.field(name) {
                        Some(field) => codec.encode(field),
                        None if matches!(codec.kind(), CodecKind::Option(_)) => Ok(Bytes::new()),
                        None => Err(CodecError::MissingField(name.clone())),
                    };
                    parts.push(part.map_err(CodecError::nested(format!("table.{name}")))?);
                }
                write_with_offsets(&parts, out)?;
            }
            (kind, value) => {
                return Err(CodecError::UnexpectedValue {
                    codec: kind.name(),
                    expected: kind.value_shape(),
                    actual: value.shape(),
                });
            }
        }
        Ok(())
    }

    fn decode_with(&self, data: &[u8], compatible: bool) -> Result<Value, CodecError> {
        if let Some(expected) = self.byte_length {
            if data.len() != expected {
                return Err(CodecError::InvalidSize {
                    codec: self.kind().name(),
                    expected,
                    actual: data.len(),
                });
            }
        }
        match self.kind() {
            CodecKind::Byte => Ok(Value::Byte(data[0])),
            CodecKind::Number(_) => Ok(Value::Number(
                data.iter()
                    .rev()
                    .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte)),
            )),
            CodecKind::ByteArray(_) => Ok(Value::Bytes(Bytes::copy_from_slice(data))),
            CodecKind::Bytes => {
                let count = read_count("bytes", data)?;
                let expected = NUMBER_SIZE + count;
                if data.len() != expected {
                    return Err(CodecError::InvalidSize {
                        codec: "bytes",
                        expected,
                        actual: data.len(),
                    });
                }
                Ok(Value::Bytes(Bytes::copy_from_slice(&data[NUMBER_SIZE..])))
            }
            CodecKind::Array { item, count } => decode_fixed_items(item, data, *count, compatible)
                .map(Value::List)
                .map_err(CodecError::nested("array")),
            CodecKind::FixVec(item) => {
                let count = read_count("fixedItemVec", data)?;
                let item_size = item.byte_length.unwrap_or_default();
                let expected = count
                    .checked_mul(item_size)
                    .and_then(|size| size.checked_add(NUMBER_SIZE))
                    .unwrap_or(usize::MAX);
                if data.len() != expected {
                    return Err(CodecError::InvalidSize {
                        codec: "fixedItemVec",
                        expected,
                        actual: data.len(),
                    });
                }
                decode_fixed_items(item, &data[NUMBER_SIZE..], count, compatible)
                    .map(Value::List)
                    .map_err(CodecError::nested("fixedItemVec"))
            }
            CodecKind::DynVec(item) => {
                let offsets = read_offsets("dynItemVec", data)?;
                offsets
                    .windows(2)
                    .map(|range| item.decode_with(&data[range[0]..range[1]], compatible))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
                    .map_err(CodecError::nested("dynItemVec"))
            }
            CodecKind::Option(inner) => {
                if data.is_empty() {
                    return Ok(Value::none());
                }
                inner
                    .decode_with(data, compatible)
                    .map(Value::some)
                    .map_err(CodecError::nested("option"))
            }
            CodecKind::Union(variants) => {
                if data.len() < NUMBER_SIZE {
                    return Err(CodecError::TooShort {
                        codec: "union",
                        expected: NUMBER_SIZE,
                        actual: data.len(),
                    });
                }
                let id = unpack_number(data);
                let variant = variants
                    .iter()
                    .find(|variant| variant.id == id)
                    .ok_or_else(|| CodecError::UnknownUnionId {
                        id,
                        expected: variant_names(variants),
                    })?;
                let value = variant
                    .codec
                    .decode_with(&data[NUMBER_SIZE..], compatible)
                    .map_err(CodecError::nested(format!("union.({})", variant.name)))?;
                Ok(Value::union(variant.name.clone(), value))
            }
            CodecKind::Struct(fields) => {
                let mut start = 0;
                let mut record = Vec::with_capacity(fields.len());
                for (name, codec) in fields {
                    let end = start + codec.byte_length.unwrap_or_default();
                    let value = codec
                        .decode_with(&data[start..end], compatible)
                        .map_err(CodecError::nested(format!("struct.{name}")))?;
                    record.push((name.clone(), value));
                    start = end;
                }
                Ok(Value::Record(record))
            }
            CodecKind::Table(fields) => {
                let offsets = read_offsets("table", data)?;
                let actual = offsets.len() - 1;
                if actual < fields.len() || (actual > fields.len() && !compatible) {
                    return Err(CodecError::FieldCount {
                        expected: fields.len(),
                        actual,
                    });
                }
                let mut record = Vec::with_capacity(fields.len());
                for (index, (name, codec)) in fields.iter().enumerate() {
                    let payload = &data[offsets[index]..offsets[index + 1]];
                    let value = codec
                        .decode_with(payload, compatible)
                        .map_err(CodecError::nested(format!("table.{name}")))?;
                    record.push((name.clone(), value));
                }
                Ok(Value::Record(record))
            }
        }
    }
}

impl CodecKind {
    fn name(&self) -> &'static str {
        match self {
            CodecKind::Byte => "byte",
            CodecKind::Number(_) => "number",
            CodecKind::ByteArray(_) | CodecKind::Array { .. } => "array",
            CodecKind::Bytes => "bytes",
            CodecKind::FixVec(_) => "fixedItemVec",
            CodecKind::DynVec(_) => "dynItemVec",
            CodecKind::Option(_) => "option",
            CodecKind::Union(_) => "union",
            CodecKind::Struct(_) => "struct",
            CodecKind::Table(_) => "table",
        }
    }

    fn value_shape(&self) -> &'static str {
        match self {
            CodecKind::Byte => "byte",
            CodecKind::Number(_) => "number",
            CodecKind::ByteArray(_) | CodecKind::Bytes => "bytes",
            CodecKind::Array { .. } | CodecKind::FixVec(_) | CodecKind::DynVec(_) => "list",
            CodecKind::Option(_) => "option",
            CodecKind::Union(_) => "union",
            CodecKind::Struct(_) | CodecKind::Table(_) => "record",
        }
    }
}

fn variant_names(variants: &[UnionVariant]) -> String {
    variants
        .iter()
        .map(|variant| variant.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn to_number(len: usize) -> Result<Number, CodecError> {
    Number::try_from(len).map_err(|_| CodecError::InvalidSize {
        codec: "header",
        expected: Number::MAX as usize,
        actual: len,
    })
}

fn read_count(codec: &'static str, data: &[u8]) -> Result<usize, CodecError> {
    if data.len() < NUMBER_SIZE {
        return Err(CodecError::TooShort {
            codec,
            expected: NUMBER_SIZE,
            actual: data.len(),
        });
    }
    Ok(unpack_number(data) as usize)
}

// `data` holds exactly `count` items.
fn decode_fixed_items(
    item: &Codec,
    data: &[u8],
    count: usize,
    compatible: bool,
) -> Result<Vec<Value>, CodecError> {
    let size = item.byte_length.unwrap_or_default();
    (0..count)
        .map(|index| item.decode_with(&data[index * size..(index + 1) * size], compatible))
        .collect()
}

// Returns every item start followed by the total size.
fn read_offsets(codec: &'static str, data: &[u8]) -> Result<Vec<usize>, CodecError> {
    let total = read_count(codec, data)?;
    if total != data.len() {
        return Err(CodecError::InvalidSize {
            codec,
            expected: total,
            actual: data.len(),
        });
    }
    if total == NUMBER_SIZE {
        return Ok(vec![total]);
    }
    if total < NUMBER_SIZE * 2 {
        return Err(CodecError::TooShort {
            codec,
            expected: NUMBER_SIZE * 2,
            actual: total,
        });
    }
    let first = unpack_number(&data[NUMBER_SIZE..]) as usize;
    if first % NUMBER_SIZE != 0 || first < NUMBER_SIZE * 2 || first > total {
        return Err(CodecError::BrokenOffsets(codec));
    }
    let count = first / NUMBER_SIZE - 1;
    let mut offsets = (0..count)
        .map(|index| unpack_number(&data[NUMBER_SIZE * (index + 1)..]) as usize)
        .collect::<Vec<_>>();
    offsets.push(total);
    if offsets.windows(2).any(|range| range[0] > range[1]) {
        return Err(CodecError::BrokenOffsets(codec));
    }
    Ok(offsets)
}

fn write_with_offsets(parts: &[Bytes], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let header_size = NUMBER_SIZE * (parts.len() + 1);
    let total = header_size + parts.iter().map(Bytes::len).sum::<usize>();
    out.extend_from_slice(&pack_number(to_number(total)?));
    let mut offset = header_size;
    for part in parts {
        out.extend_from_slice(&pack_number(to_number(offset)?));
        offset += part.len();
    }
    for part in parts {
        out.extend_from_slice(part);
    }
    Ok(())
}
