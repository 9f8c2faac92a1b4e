use ckb_error::{impl_error_conversion_with_kind, prelude::*, ErrorKind};

/// Errors raised while validating or compiling schema declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two declarations share a name.
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// A struct or table declares the same field twice.
    #[error("Duplicate field name: {declaration}.{field}")]
    DuplicateField {
        /// The struct or table.
        declaration: String,
        /// The repeated field name.
        field: String,
    },

    /// A declaration references a name that is neither declared nor an external reference.
    #[error("Dependency {dependency} not found for {kind} type {declaration}")]
    DependencyNotFound {
        /// The missing name.
        dependency: String,
        /// Kind of the referencing declaration.
        kind: &'static str,
        /// The referencing declaration.
        declaration: String,
    },

    /// An external reference used inside an array or struct is not fixed-size.
    #[error("Dependency {dependency} is not fixed length for {kind} type {declaration}")]
    DependencyNotFixed {
        /// The external reference.
        dependency: String,
        /// Kind of the referencing declaration.
        kind: &'static str,
        /// The referencing declaration.
        declaration: String,
    },

    /// A dynamic-size declaration is reached from an array or struct.
    #[error("Type {kind} {name} should be fixed length")]
    NotFixedLength {
        /// Kind of the offending declaration.
        kind: &'static str,
        /// The offending declaration.
        name: String,
    },

    /// An explicit union item id does not fit a `u32`.
    #[error("Union item {item} of {declaration} has id {id} which exceeds u32")]
    UnionIdOverflow {
        /// The union.
        declaration: String,
        /// The item carrying the id.
        item: String,
        /// The declared id.
        id: u64,
    },

    /// Two items of a union resolve to the same id.
    #[error("Duplicate union id {id} in {declaration}")]
    DuplicateUnionId {
        /// The union.
        declaration: String,
        /// The repeated id.
        id: u32,
    },

    /// A declaration depends on itself.
    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    /// Compilation reached a name with no declaration and no external reference.
    #[error("Codec not found: {missing} (required by {required_by})")]
    CodecNotFound {
        /// The unresolved name.
        missing: String,
        /// The declaration that references it.
        required_by: String,
    },

    /// The schema text is malformed.
    #[error("Syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What the parser expected.
        message: String,
    },
}

/// Errors raised while encoding or decoding a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer length contradicts the layout.
    #[error("{codec}: invalid buffer size, expected {expected}, but got {actual}")]
    InvalidSize {
        /// Layout name.
        codec: &'static str,
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// The buffer cannot even hold the header.
    #[error("{codec}: too short buffer, expected at least {expected} bytes, but got {actual}")]
    TooShort {
        /// Layout name.
        codec: &'static str,
        /// Minimal byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// The offset header is not well formed.
    #[error("{0}: broken offsets")]
    BrokenOffsets(&'static str),

    /// A table holds a different number of fields than declared.
    #[error("table: field count {actual} does not match {expected}")]
    FieldCount {
        /// Declared field count.
        expected: usize,
        /// Field count found in the header.
        actual: usize,
    },

    /// The value shape does not fit the codec.
    #[error("{codec}: expected {expected} value, but got {actual}")]
    UnexpectedValue {
        /// Layout name.
        codec: &'static str,
        /// Expected value shape.
        expected: &'static str,
        /// Actual value shape.
        actual: &'static str,
    },

    /// A fixed-size layout got a value with the wrong number of items or bytes.
    #[error("{codec}: expected {expected} items, but got {actual}")]
    ItemCount {
        /// Layout name.
        codec: &'static str,
        /// Declared item count.
        expected: usize,
        /// Actual item count.
        actual: usize,
    },

    /// A number does not fit its declared width.
    #[error("number {value} does not fit in {width} bytes")]
    NumberOverflow {
        /// The number.
        value: u128,
        /// Declared byte width.
        width: usize,
    },

    /// A record value lacks a required field.
    #[error("missing field {0}")]
    MissingField(String),

    /// A union value names an unknown item.
    #[error("union: invalid type, expected {expected}, but got {actual}")]
    UnknownUnionItem {
        /// Comma separated item names.
        expected: String,
        /// The given item name.
        actual: String,
    },

    /// A union buffer carries an unknown id.
    #[error("union: unknown union field index {id}, only {expected} are allowed")]
    UnknownUnionId {
        /// The id in the buffer.
        id: u32,
        /// Comma separated item names.
        expected: String,
    },

    /// An error raised inside a nested layout.
    #[error("{context}({source})")]
    Nested {
        /// Location of the nested layout, e.g. `table.lock`.
        context: String,
        /// The nested error.
        source: Box<CodecError>,
    },
}

impl CodecError {
    pub(crate) fn nested<C: Into<String>>(context: C) -> impl FnOnce(CodecError) -> CodecError {
        let context = context.into();
        move |source| CodecError::Nested {
            context,
            source: Box::new(source),
        }
    }
}

impl_error_conversion_with_kind!(SchemaError, ErrorKind::Schema, ckb_error::Error);
impl_error_conversion_with_kind!(CodecError, ErrorKind::Codec, ckb_error::Error);
