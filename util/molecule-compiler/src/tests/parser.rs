use crate::{parse, Declaration, Field, SchemaError, UnionItem};
use pretty_assertions::assert_eq;

#[test]
fn parses_every_kind() {
    let declarations = parse(
        r#"
        syntax = 2;
        // single byte aliases
        array Byte32 [byte; 0x20];
        vector Bytes <byte>;
        option BytesOpt (Bytes);
        /* a union with
           one explicit id */
        union Payload { Byte32, Bytes: 1_000, }
        struct Pair { a: Byte32, b: byte };
        table Holder { payload: Payload }
        "#,
    )
    .unwrap();
    assert_eq!(
        declarations,
        vec![
            Declaration::Array {
                name: "Byte32".to_owned(),
                item: "byte".to_owned(),
                item_count: 32,
            },
            Declaration::Vector {
                name: "Bytes".to_owned(),
                item: "byte".to_owned(),
            },
            Declaration::Option {
                name: "BytesOpt".to_owned(),
                item: "Bytes".to_owned(),
            },
            Declaration::Union {
                name: "Payload".to_owned(),
                items: vec![
                    UnionItem::from("Byte32"),
                    UnionItem::WithId("Bytes".to_owned(), 1000),
                ],
            },
            Declaration::Struct {
                name: "Pair".to_owned(),
                fields: vec![Field::new("a", "Byte32"), Field::new("b", "byte")],
            },
            Declaration::Table {
                name: "Holder".to_owned(),
                fields: vec![Field::new("payload", "Payload")],
            },
        ]
    );
}

#[test]
fn empty_table() {
    assert_eq!(
        parse("table Empty {}").unwrap(),
        vec![Declaration::Table {
            name: "Empty".to_owned(),
            fields: Vec::new(),
        }]
    );
}

#[test]
fn syntax_errors_carry_the_line() {
    assert_eq!(
        parse("vector Bytes <byte>;\narray Bad [byte 4];"),
        Err(SchemaError::Syntax {
            line: 2,
            message: "expected ';', found Some(Number(4))".to_owned(),
        })
    );
    assert!(matches!(
        parse("vector Bytes <byte>"),
        Err(SchemaError::Syntax { line: 1, .. })
    ));
    assert!(matches!(
        parse("import blockchain;"),
        Err(SchemaError::Syntax { .. })
    ));
    assert!(matches!(
        parse("/* never closed"),
        Err(SchemaError::Syntax { .. })
    ));
    assert_eq!(
        parse("\n\nenum Kind {}").unwrap_err().to_string(),
        "Syntax error at line 3: unknown keyword enum"
    );
}
