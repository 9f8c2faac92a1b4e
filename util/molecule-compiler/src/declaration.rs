//! Schema declarations, the input of the validator and the compiler.
//!
//! Declarations deserialize from the JSON shape produced by the schema parser:
//!
//! ```json
//! { "type": "array", "name": "Byte32", "item": "byte", "item_count": 32 }
//! { "type": "union", "name": "Value", "items": ["Byte32", ["Bytes", 8]] }
//! ```

use serde::{Deserialize, Serialize};

/// The primitive byte type, never declared.
pub const BYTE: &str = "byte";

/// A named type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Declaration {
    /// Fixed count of fixed-size items.
    Array {
        /// Declared name.
        name: String,
        /// Item type.
        item: String,
        /// Item count.
        item_count: usize,
    },
    /// Length-prefixed items of any size.
    Vector {
        /// Declared name.
        name: String,
        /// Item type.
        item: String,
    },
    /// Present or absent item.
    Option {
        /// Declared name.
        name: String,
        /// Item type.
        item: String,
    },
    /// Tagged sum of items.
    Union {
        /// Declared name.
        name: String,
        /// Items, optionally with explicit ids.
        items: Vec<UnionItem>,
    },
    /// Fixed-size concatenation of fields.
    Struct {
        /// Declared name.
        name: String,
        /// Ordered fields.
        fields: Vec<Field>,
    },
    /// Offset-indexed concatenation of fields.
    Table {
        /// Declared name.
        name: String,
        /// Ordered fields.
        fields: Vec<Field>,
    },
}

/// A field of a struct or table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: String,
}

/// An item of a union.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnionItem {
    /// The id is the position of the item.
    Named(String),
    /// The id is given explicitly.
    WithId(String, u64),
}

impl Declaration {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Array { name, .. }
            | Declaration::Vector { name, .. }
            | Declaration::Option { name, .. }
            | Declaration::Union { name, .. }
            | Declaration::Struct { name, .. }
            | Declaration::Table { name, .. } => name,
        }
    }

    /// The keyword of this declaration kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Array { .. } => "array",
            Declaration::Vector { .. } => "vector",
            Declaration::Option { .. } => "option",
            Declaration::Union { .. } => "union",
            Declaration::Struct { .. } => "struct",
            Declaration::Table { .. } => "table",
        }
    }

    /// Every type name this declaration refers to, in declaration order, `byte` included.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Declaration::Array { item, .. }
            | Declaration::Vector { item, .. }
            | Declaration::Option { item, .. } => vec![item.as_str()],
            Declaration::Union { items, .. } => items.iter().map(UnionItem::name).collect(),
            Declaration::Struct { fields, .. } | Declaration::Table { fields, .. } => {
                fields.iter().map(|field| field.ty.as_str()).collect()
            }
        }
    }

    /// Whether the layout is fixed-size by construction.
    pub fn is_fixed_kind(&self) -> bool {
        matches!(self, Declaration::Array { .. } | Declaration::Struct { .. })
    }
}

impl Field {
    /// Creates a field.
    pub fn new<N: Into<String>, T: Into<String>>(name: N, ty: T) -> Self {
        Field {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl UnionItem {
    /// The item type name.
    pub fn name(&self) -> &str {
        match self {
            UnionItem::Named(name) | UnionItem::WithId(name, _) => name,
        }
    }

    /// The explicit id, if any.
    pub fn explicit_id(&self) -> Option<u64> {
        match self {
            UnionItem::Named(_) => None,
            UnionItem::WithId(_, id) => Some(*id),
        }
    }
}

impl From<&str> for UnionItem {
    fn from(name: &str) -> Self {
        UnionItem::Named(name.to_owned())
    }
}
