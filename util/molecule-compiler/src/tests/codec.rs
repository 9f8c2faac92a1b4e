use super::{hex, registry};
use crate::{compile_schema, Codec, CodecError, Value};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn script_value(args: &[u8]) -> Value {
    Value::record([
        ("code_hash", Value::from(vec![0x11u8; 32])),
        ("hash_type", Value::Byte(1)),
        ("args", Value::from(args.to_vec())),
    ])
}

#[test]
fn table_layout() {
    let registry = registry();
    let script = registry.get("Script").unwrap();
    let encoded = script.encode(&script_value(&[0xab, 0xcd])).unwrap();
    assert_eq!(
        encoded.as_ref(),
        hex("3700000010000000300000003100000011111111111111111111111111111111111111111111111111111111111111110102000000abcd")
            .as_slice()
    );
    assert_eq!(script.decode(&encoded).unwrap(), script_value(&[0xab, 0xcd]));
}

#[test]
fn table_fields_by_name_in_any_order() {
    let registry = registry();
    let script = registry.get("Script").unwrap();
    let shuffled = Value::record([
        ("args", Value::from(vec![0xabu8, 0xcd])),
        ("hash_type", Value::Byte(1)),
        ("code_hash", Value::from(vec![0x11u8; 32])),
    ]);
    assert_eq!(
        script.encode(&shuffled).unwrap(),
        script.encode(&script_value(&[0xab, 0xcd])).unwrap()
    );
}

#[test]
fn dynvec_layout() {
    let registry = registry();
    let bytes_vec = registry.get("BytesVec").unwrap();
    let value = Value::List(vec![Value::from(Vec::<u8>::new()), Value::from(vec![0xabu8])]);
    let encoded = bytes_vec.encode(&value).unwrap();
    assert_eq!(
        encoded.as_ref(),
        hex("150000000c000000100000000000000001000000ab").as_slice()
    );
    assert_eq!(bytes_vec.decode(&encoded).unwrap(), value);

    let empty = bytes_vec.encode(&Value::List(Vec::new())).unwrap();
    assert_eq!(empty.as_ref(), hex("04000000").as_slice());
    assert_eq!(bytes_vec.decode(&empty).unwrap(), Value::List(Vec::new()));
}

#[test]
fn empty_option_and_vector() {
    let registry = registry();
    let opt = registry.get("BytesOpt").unwrap();
    assert!(opt.encode(&Value::none()).unwrap().is_empty());
    assert_eq!(opt.decode(&[]).unwrap(), Value::none());

    let hashes = registry.get("Byte32Vec").unwrap();
    let empty = hashes.encode(&Value::List(Vec::new())).unwrap();
    assert_eq!(empty.as_ref(), &[0, 0, 0, 0]);
    assert_eq!(hashes.decode(&empty).unwrap(), Value::List(Vec::new()));
}

#[test]
fn union_uses_explicit_and_positional_ids() {
    let registry = registry();
    let payload = registry.get("Payload").unwrap();
    let bytes = Value::union("Bytes", Value::from(vec![0xabu8]));
    let encoded = payload.encode(&bytes).unwrap();
    assert_eq!(encoded.as_ref(), hex("0800000001000000ab").as_slice());
    assert_eq!(payload.decode(&encoded).unwrap(), bytes);

    let hash = Value::union("Byte32", Value::from(vec![0u8; 32]));
    assert_eq!(&payload.encode(&hash).unwrap()[..4], &[0, 0, 0, 0]);

    assert_eq!(
        payload.decode(&hex("0100000000")),
        Err(CodecError::UnknownUnionId {
            id: 1,
            expected: "Byte32,Bytes".to_owned()
        })
    );
    assert_eq!(
        payload
            .encode(&Value::union("Script", Value::none()))
            .unwrap_err()
            .to_string(),
        "union: invalid type, expected Byte32,Bytes, but got Script"
    );
}

#[test]
fn numbers_are_little_endian() {
    let registry = registry();
    let out_point = registry.get("OutPoint").unwrap();
    assert_eq!(out_point.byte_length(), Some(36));
    let value = Value::record([
        ("tx_hash", Value::from(vec![0u8; 32])),
        ("index", Value::Number(0x0102)),
    ]);
    let encoded = out_point.encode(&value).unwrap();
    assert_eq!(&encoded[32..], &[0x02, 0x01, 0, 0]);
    assert_eq!(out_point.decode(&encoded).unwrap(), value);

    let too_big = Value::record([
        ("tx_hash", Value::from(vec![0u8; 32])),
        ("index", Value::Number(1 << 32)),
    ]);
    assert_eq!(
        out_point.encode(&too_big).unwrap_err().to_string(),
        "struct.index(number 4294967296 does not fit in 4 bytes)"
    );
}

#[test]
fn nested_errors_name_the_path() {
    let registry = registry();
    let script = registry.get("Script").unwrap();
    let value = Value::record([
        ("code_hash", Value::from(vec![0x11u8; 31])),
        ("hash_type", Value::Byte(1)),
        ("args", Value::from(Vec::<u8>::new())),
    ]);
    assert_eq!(
        script.encode(&value).unwrap_err().to_string(),
        "table.code_hash(array: invalid buffer size, expected 32, but got 31)"
    );

    let missing = Value::record([("hash_type", Value::Byte(1))]);
    assert_eq!(
        script.encode(&missing).unwrap_err().to_string(),
        "table.code_hash(missing field code_hash)"
    );
}

#[test]
fn missing_option_field_encodes_as_none() {
    let registry = compile_schema(
        "vector Bytes <byte>; option BytesOpt (Bytes); table Args { lock: BytesOpt, input_type: BytesOpt }",
        None,
    )
    .unwrap();
    let args = registry.get("Args").unwrap();
    let encoded = args
        .encode(&Value::record([("lock", Value::some(Value::from(vec![1u8])))]))
        .unwrap();
    assert_eq!(
        args.decode(&encoded).unwrap(),
        Value::record([
            ("lock", Value::some(Value::from(vec![1u8]))),
            ("input_type", Value::none()),
        ])
    );
}

#[test]
fn compatible_decoding_ignores_extra_fields() {
    let newer = compile_schema(
        r#"
        array Byte32 [byte; 32];
        vector Bytes <byte>;
        table Script { code_hash: Byte32, hash_type: byte, args: Bytes, extra: Bytes }
        "#,
        None,
    )
    .unwrap();
    let mut value = script_value(&[1, 2, 3]);
    if let Value::Record(fields) = &mut value {
        fields.push(("extra".to_owned(), Value::from(vec![9u8])));
    }
    let encoded = newer.get("Script").unwrap().encode(&value).unwrap();

    let registry = registry();
    let script = registry.get("Script").unwrap();
    assert_eq!(
        script.decode(&encoded),
        Err(CodecError::FieldCount {
            expected: 3,
            actual: 4
        })
    );
    assert_eq!(
        script.decode_compatible(&encoded).unwrap(),
        script_value(&[1, 2, 3])
    );
}

#[test]
fn malformed_headers_are_rejected() {
    let registry = registry();
    let bytes = registry.get("Bytes").unwrap();
    assert_eq!(
        bytes.decode(&[1, 0, 0]),
        Err(CodecError::TooShort {
            codec: "bytes",
            expected: 4,
            actual: 3
        })
    );
    assert_eq!(
        bytes.decode(&[2, 0, 0, 0, 1]),
        Err(CodecError::InvalidSize {
            codec: "bytes",
            expected: 6,
            actual: 5
        })
    );

    let script = registry.get("Script").unwrap();
    assert_eq!(
        script.decode(&[10, 0, 0, 0, 6, 0, 0, 0, 0, 0]),
        Err(CodecError::BrokenOffsets("table"))
    );
}

#[test]
fn standalone_codecs() {
    let pair = Codec::structure(vec![
        ("a".to_owned(), Codec::byte()),
        ("b".to_owned(), Codec::number(2)),
    ])
    .unwrap();
    assert_eq!(pair.byte_length(), Some(3));
    assert!(Codec::structure(vec![("a".to_owned(), Codec::bytes())]).is_none());
    assert!(Codec::array(Codec::bytes(), 2).is_none());
    assert!(matches!(
        Codec::vector(Codec::byte()).kind(),
        crate::CodecKind::Bytes
    ));
}

#[test]
fn zero_sized_items_keep_their_count() {
    let empty = Codec::structure(Vec::new()).unwrap();
    let items = Value::List(vec![Value::Record(Vec::new()); 3]);

    let array = Codec::array(empty.clone(), 3).unwrap();
    let encoded = array.encode(&items).unwrap();
    assert!(encoded.is_empty());
    assert_eq!(array.decode(&encoded).unwrap(), items);

    let vector = Codec::vector(empty);
    let encoded = vector.encode(&items).unwrap();
    assert_eq!(encoded.as_ref(), &[3u8, 0, 0, 0][..]);
    assert_eq!(vector.decode(&encoded).unwrap(), items);
}

fn arb_out_point() -> impl Strategy<Value = Value> {
    (prop::collection::vec(any::<u8>(), 32), any::<u32>()).prop_map(|(hash, index)| {
        Value::record([
            ("tx_hash", Value::Bytes(Bytes::from(hash))),
            ("index", Value::Number(u128::from(index))),
        ])
    })
}

proptest! {
    #[test]
    fn fixvec_round_trip(items in prop::collection::vec(arb_out_point(), 0..8)) {
        let registry = registry();
        let codec = registry.get("OutPointVec").unwrap();
        let value = Value::List(items);
        let encoded = codec.encode(&value).unwrap();
        prop_assert_eq!(codec.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn dynvec_round_trip(items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..8)) {
        let registry = registry();
        let codec = registry.get("BytesVec").unwrap();
        let value = Value::List(items.into_iter().map(Value::from).collect());
        let encoded = codec.encode(&value).unwrap();
        prop_assert_eq!(codec.decode(&encoded).unwrap(), value);
    }
}
