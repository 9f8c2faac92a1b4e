use super::registry;
use crate::{compile, compile_schema, parse, CodecKind, Declaration, Field, SchemaError};
use pretty_assertions::assert_eq;

#[test]
fn unresolved_name_reports_both_sides() {
    let declarations = vec![Declaration::Table {
        name: "Foo".to_owned(),
        fields: vec![Field::new("bar", "Missing")],
    }];
    let err = compile(&declarations, None).unwrap_err();
    assert_eq!(err.to_string(), "Codec not found: Missing (required by Foo)");
}

#[test]
fn self_referencing_declarations_are_rejected() {
    let declarations = parse("table Node { next: NodeOpt } option NodeOpt (Node);").unwrap();
    assert_eq!(
        compile(&declarations, None).unwrap_err(),
        SchemaError::CircularDependency(vec![
            "Node".to_owned(),
            "NodeOpt".to_owned(),
            "Node".to_owned()
        ])
    );
}

#[test]
fn external_references_are_not_copied() {
    let base = registry();
    let extra = compile_schema("table Cell { lock: Script, data: Bytes }", Some(&base)).unwrap();
    assert_eq!(extra.len(), 1);
    assert!(extra.contains("Cell"));
    assert!(!extra.contains("Script"));
}

#[test]
fn declaration_order_does_not_matter() {
    let registry = compile_schema(
        "vector Hashes <Byte32>; array Byte32 [byte; 32];",
        None,
    )
    .unwrap();
    assert!(matches!(
        registry.get("Hashes").unwrap().kind(),
        CodecKind::FixVec(_)
    ));
}

#[test]
fn uint_arrays_become_numbers() {
    let registry = compile_schema(
        "array Uint8 [byte; 1]; array Uint128 [byte; 16]; array Uint256 [byte; 32]; array Uint64 [byte; 4];",
        None,
    )
    .unwrap();
    assert!(matches!(registry.get("Uint8").unwrap().kind(), CodecKind::Number(1)));
    assert!(matches!(
        registry.get("Uint128").unwrap().kind(),
        CodecKind::Number(16)
    ));
    assert!(matches!(
        registry.get("Uint256").unwrap().kind(),
        CodecKind::ByteArray(32)
    ));
    // a width that does not match the name stays raw
    assert!(matches!(
        registry.get("Uint64").unwrap().kind(),
        CodecKind::ByteArray(4)
    ));
}

#[test]
fn union_ids() {
    let registry = registry();
    match registry.get("Payload").unwrap().kind() {
        CodecKind::Union(variants) => {
            let ids: Vec<(&str, u32)> = variants
                .iter()
                .map(|variant| (variant.name.as_str(), variant.id))
                .collect();
            assert_eq!(ids, vec![("Byte32", 0), ("Bytes", 8)]);
        }
        other => panic!("unexpected codec {other:?}"),
    }
}

#[test]
fn declarations_from_json() {
    let json = r#"[
        { "type": "array", "name": "Byte32", "item": "byte", "item_count": 32 },
        { "type": "vector", "name": "Bytes", "item": "byte" },
        { "type": "union", "name": "Payload", "items": ["Byte32", ["Bytes", 8]] },
        { "type": "table", "name": "Pair", "fields": [
            { "name": "key", "type": "Byte32" },
            { "name": "value", "type": "Payload" }
        ] }
    ]"#;
    let declarations: Vec<Declaration> = serde_json::from_str(json).unwrap();
    assert_eq!(
        declarations,
        parse(
            "array Byte32 [byte; 32]; vector Bytes <byte>; \
             union Payload { Byte32, Bytes: 8 } table Pair { key: Byte32, value: Payload }"
        )
        .unwrap()
    );
    let registry = compile(&declarations, None).unwrap();
    assert_eq!(registry.len(), 4);
}
