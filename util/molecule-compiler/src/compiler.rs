use crate::{
    codec::{Codec, UnionVariant},
    declaration::{Declaration, Field, BYTE},
    error::SchemaError,
};
use log::trace;
use std::collections::HashMap;

/// Compiled codecs keyed by declared name.
#[derive(Clone, Debug, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Codec>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `codec` under `name`, replacing any previous one.
    pub fn insert<S: Into<String>>(&mut self, name: S, codec: Codec) {
        self.codecs.insert(name.into(), codec);
    }

    /// Looks a codec up.
    pub fn get(&self, name: &str) -> Option<&Codec> {
        self.codecs.get(name)
    }

    /// Looks a codec up, failing with a diagnostic naming both sides.
    pub fn require(&self, name: &str, required_by: &str) -> Result<&Codec, SchemaError> {
        self.get(name).ok_or_else(|| SchemaError::CodecNotFound {
            missing: name.to_owned(),
            required_by: required_by.to_owned(),
        })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// Number of codecs.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Iterates `(name, codec)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Codec)> {
        self.codecs.iter().map(|(name, codec)| (name.as_str(), codec))
    }
}

/// Builds a codec for every declaration.
///
/// Each name is built once even when several declarations depend on it. A name resolves to an
/// already built codec first, then to `refs`, then to its declaration. Unresolvable names fail
/// with [`SchemaError::CodecNotFound`] and self-dependent declarations with
/// [`SchemaError::CircularDependency`].
pub fn compile(
    declarations: &[Declaration],
    refs: Option<&CodecRegistry>,
) -> Result<CodecRegistry, SchemaError> {
    let mut compiler = Compiler {
        declarations: declarations
            .iter()
            .map(|declaration| (declaration.name(), declaration))
            .collect(),
        refs,
        built: CodecRegistry::new(),
        building: Vec::new(),
    };
    for declaration in declarations {
        compiler.resolve(declaration.name(), declaration.name())?;
    }
    Ok(compiler.built)
}

struct Compiler<'a> {
    declarations: HashMap<&'a str, &'a Declaration>,
    refs: Option<&'a CodecRegistry>,
    built: CodecRegistry,
    building: Vec<String>,
}

impl<'a> Compiler<'a> {
    fn resolve(&mut self, name: &str, required_by: &str) -> Result<Codec, SchemaError> {
        if name == BYTE {
            return Ok(Codec::byte());
        }
        if let Some(codec) = self.built.get(name) {
            return Ok(codec.clone());
        }
        if let Some(codec) = self.refs.and_then(|refs| refs.get(name)) {
            return Ok(codec.clone());
        }
        let declaration = *self
            .declarations
            .get(name)
            .ok_or_else(|| SchemaError::CodecNotFound {
                missing: name.to_owned(),
                required_by: required_by.to_owned(),
            })?;
        if let Some(start) = self.building.iter().position(|building| building == name) {
            let mut cycle = self.building[start..].to_vec();
            cycle.push(name.to_owned());
            return Err(SchemaError::CircularDependency(cycle));
        }

        self.building.push(name.to_owned());
        let codec = self.build(declaration);
        self.building.pop();
        let codec = codec?;

        trace!("compiled {} codec {}", declaration.kind(), name);
        self.built.insert(name, codec.clone());
        Ok(codec)
    }

    fn build(&mut self, declaration: &Declaration) -> Result<Codec, SchemaError> {
        let name = declaration.name();
        let not_fixed = || SchemaError::NotFixedLength {
            kind: declaration.kind(),
            name: name.to_owned(),
        };
        match declaration {
            Declaration::Array {
                item, item_count, ..
            } => {
                if item == BYTE {
                    return Ok(number_codec(name, *item_count)
                        .unwrap_or_else(|| Codec::byte_array(*item_count)));
                }
                let item = self.resolve(item, name)?;
                Codec::array(item, *item_count).ok_or_else(not_fixed)
            }
            Declaration::Vector { item, .. } => Ok(Codec::vector(self.resolve(item, name)?)),
            Declaration::Option { item, .. } => Ok(Codec::option(self.resolve(item, name)?)),
            Declaration::Union { items, .. } => {
                let mut variants = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let id = item.explicit_id().unwrap_or(index as u64);
                    let id = u32::try_from(id).map_err(|_| SchemaError::UnionIdOverflow {
                        declaration: name.to_owned(),
                        item: item.name().to_owned(),
                        id,
                    })?;
                    variants.push(UnionVariant {
                        name: item.name().to_owned(),
                        id,
                        codec: self.resolve(item.name(), name)?,
                    });
                }
                Ok(Codec::union(variants))
            }
            Declaration::Struct { fields, .. } => {
                let fields = self.resolve_fields(fields, name)?;
                Codec::structure(fields).ok_or_else(not_fixed)
            }
            Declaration::Table { fields, .. } => {
                Ok(Codec::table(self.resolve_fields(fields, name)?))
            }
        }
    }

    fn resolve_fields(
        &mut self,
        fields: &[Field],
        required_by: &str,
    ) -> Result<Vec<(String, Codec)>, SchemaError> {
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            resolved.push((field.name.clone(), self.resolve(&field.ty, required_by)?));
        }
        Ok(resolved)
    }
}

// `Uint8` .. `Uint128` byte arrays decode to numbers; wider ones stay raw bytes.
fn number_codec(name: &str, item_count: usize) -> Option<Codec> {
    let width = match name {
        "Uint8" => 1,
        "Uint16" => 2,
        "Uint32" => 4,
        "Uint64" => 8,
        "Uint128" => 16,
        _ => return None,
    };
    (width == item_count).then(|| Codec::number(width))
}
