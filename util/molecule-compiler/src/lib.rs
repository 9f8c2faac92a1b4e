//! Schema-driven molecule codecs.
//!
//! Declarations, either parsed from schema text or deserialized from JSON, are checked by
//! [`validate`] and turned into a [`CodecRegistry`] by [`compile`]. Every codec in the registry
//! encodes and decodes dynamic [`Value`]s.

mod codec;
mod compiler;
mod declaration;
mod error;
mod parser;
mod validator;
mod value;

#[cfg(test)]
mod tests;

pub use crate::codec::{Codec, CodecKind, UnionVariant};
pub use crate::compiler::{compile, CodecRegistry};
pub use crate::declaration::{Declaration, Field, UnionItem, BYTE};
pub use crate::error::{CodecError, SchemaError};
pub use crate::parser::parse;
pub use crate::validator::validate;
pub use crate::value::Value;

/// Parses, validates and compiles schema text in one go.
pub fn compile_schema(
    source: &str,
    refs: Option<&CodecRegistry>,
) -> Result<CodecRegistry, SchemaError> {
    let declarations = parse(source)?;
    validate(&declarations, refs)?;
    compile(&declarations, refs)
}
