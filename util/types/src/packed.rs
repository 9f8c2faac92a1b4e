//! The blockchain schema and its compiled codecs.
//!
//! The registry is compiled once, on first use. Schemas of scripts built on top of the blockchain
//! types can reference it:
//!
//! ```
//! use ckb_types::{molecule::compile_schema, packed};
//!
//! let udt = compile_schema("table Info { owner: Script, amount: Uint128 }", Some(packed::registry()))
//!     .unwrap();
//! assert!(udt.contains("Info"));
//! ```

use ckb_molecule_compiler::{compile_schema, Codec, CodecRegistry};
use once_cell::sync::Lazy;

/// The blockchain schema source.
pub const BLOCKCHAIN_SCHEMA: &str = include_str!("../schemas/blockchain.mol");

static BLOCKCHAIN: Lazy<CodecRegistry> = Lazy::new(|| {
    compile_schema(BLOCKCHAIN_SCHEMA, None).expect("the embedded blockchain schema is valid")
});

/// All codecs of the blockchain schema.
pub fn registry() -> &'static CodecRegistry {
    &BLOCKCHAIN
}

/// The codec of a blockchain schema declaration.
///
/// # Panics
///
/// Panics when `name` is not declared in [`BLOCKCHAIN_SCHEMA`].
pub fn codec(name: &str) -> &'static Codec {
    BLOCKCHAIN
        .get(name)
        .unwrap_or_else(|| panic!("{name} is not declared in the blockchain schema"))
}
