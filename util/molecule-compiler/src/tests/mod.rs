mod codec;
mod compiler;
mod parser;

use crate::{compile_schema, CodecRegistry};

pub(crate) const BLOCKCHAIN: &str = r#"
    array Uint32 [byte; 4];
    array Uint64 [byte; 8];
    array Byte32 [byte; 32];
    vector Bytes <byte>;
    option BytesOpt (Bytes);
    vector BytesVec <Bytes>;
    vector Byte32Vec <Byte32>;

    table Script {
        code_hash: Byte32,
        hash_type: byte,
        args: Bytes,
    }
    option ScriptOpt (Script);

    struct OutPoint {
        tx_hash: Byte32,
        index: Uint32,
    }
    vector OutPointVec <OutPoint>;

    union Payload {
        Byte32,
        Bytes: 8,
    }
"#;

pub(crate) fn registry() -> CodecRegistry {
    compile_schema(BLOCKCHAIN, None).expect("compile blockchain schema")
}

pub(crate) fn hex(s: &str) -> Vec<u8> {
    let mut dst = vec![0u8; s.len() / 2];
    faster_hex::hex_decode(s.as_bytes(), &mut dst).expect("valid hex");
    dst
}
